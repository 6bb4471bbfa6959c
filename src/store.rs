//! Pipe-delimited flat store: append-only ingestion, full rewrite for the
//! filtered output.

use crate::consts::store::{DATE_FORMAT, DELIMITER, FIELDS};
use crate::record::Record;
use chrono::NaiveDate;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
        move |source| StoreError::Io { path: path.to_path_buf(), source }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Organization,
    Title,
    Location,
    IdentityKey,
    PostedOn,
}

impl Field {
    const POSITIONAL: [Field; 5] = [
        Field::Organization,
        Field::Title,
        Field::Location,
        Field::IdentityKey,
        Field::PostedOn,
    ];

    /// Canonical names plus the column names older exports used
    fn from_header(name: &str) -> Option<Field> {
        match name.trim().to_ascii_lowercase().as_str() {
            "organization" | "company" => Some(Field::Organization),
            "title" => Some(Field::Title),
            "location" => Some(Field::Location),
            "identity_key" | "link" | "url" => Some(Field::IdentityKey),
            "posted_on" | "date" => Some(Field::PostedOn),
            _ => None,
        }
    }

    fn set(self, record: &mut Record, value: &str) {
        let slot = match self {
            Field::Organization => &mut record.organization,
            Field::Title => &mut record.title,
            Field::Location => &mut record.location,
            Field::IdentityKey => &mut record.identity_key,
            Field::PostedOn => &mut record.posted_on,
        };
        *slot = value.to_string();
    }

    fn get(self, record: &Record) -> &str {
        match self {
            Field::Organization => &record.organization,
            Field::Title => &record.title,
            Field::Location => &record.location,
            Field::IdentityKey => &record.identity_key,
            Field::PostedOn => &record.posted_on,
        }
    }
}

/// Column layout of a store file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    /// First line names the columns; unknown columns map to `None`
    Declared(Vec<Option<Field>>),
    /// Compatibility shim for headerless legacy files, canonical column order
    Positional,
}

impl Schema {
    pub fn detect(first_line: &str) -> Self {
        let columns: Vec<Option<Field>> =
            first_line.split(DELIMITER).map(Field::from_header).collect();
        if columns.iter().any(Option::is_some) {
            Schema::Declared(columns)
        } else {
            Schema::Positional
        }
    }

    fn parse_row(&self, line: &str) -> Record {
        let mut record = Record::default();
        let cells = line.split(DELIMITER);
        match self {
            Schema::Declared(columns) => {
                for (column, cell) in columns.iter().zip(cells) {
                    if let Some(field) = column {
                        field.set(&mut record, cell);
                    }
                }
            }
            Schema::Positional => {
                for (field, cell) in Field::POSITIONAL.iter().zip(cells) {
                    field.set(&mut record, cell);
                }
            }
        }
        record
    }

    /// One line in this layout. Columns with no field stay empty.
    fn encode_row(&self, record: &Record) -> String {
        let cells: Vec<String> = match self {
            Schema::Declared(columns) => columns
                .iter()
                .map(|column| column.map(|field| encode_cell(field.get(record))).unwrap_or_default())
                .collect(),
            Schema::Positional => Field::POSITIONAL
                .iter()
                .map(|field| encode_cell(field.get(record)))
                .collect(),
        };
        let mut line = cells.join(&DELIMITER.to_string());
        line.push('\n');
        line
    }
}

/// Parse store content. Blank lines are skipped.
pub fn parse(content: &str) -> Vec<Record> {
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());
    let Some(first) = lines.next() else {
        return Vec::new();
    };

    let schema = Schema::detect(first);
    let mut records = Vec::new();
    if schema == Schema::Positional {
        log::debug!("No header found, using positional schema");
        records.push(schema.parse_row(first));
    }
    records.extend(lines.map(|line| schema.parse_row(line)));
    records
}

pub fn read(path: &Path) -> Result<Vec<Record>, StoreError> {
    let content = fs::read_to_string(path).map_err(StoreError::io(path))?;
    Ok(parse(&content))
}

/// Append records, writing the header first when the file is new or empty.
/// Rows follow the column order the file already declares. Records without a
/// posting date get `today`.
pub fn append(path: &Path, records: &[Record], today: NaiveDate) -> Result<usize, StoreError> {
    ensure_parent(path)?;
    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(StoreError::Io { path: path.to_path_buf(), source: e }),
    };

    let mut body = String::new();
    let schema = match existing.lines().find(|line| !line.trim().is_empty()) {
        Some(first) => Schema::detect(first),
        None => {
            body.push_str(&header_line());
            Schema::Positional
        }
    };
    // a last line without its newline would swallow the first appended row
    if !existing.is_empty() && !existing.ends_with('\n') {
        body.insert(0, '\n');
    }

    let today = today.format(DATE_FORMAT).to_string();
    for record in records {
        let mut record = record.clone();
        record.inject_default_date(&today);
        body.push_str(&schema.encode_row(&record));
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(StoreError::io(path))?;
    let mut out = BufWriter::new(file);
    out.write_all(body.as_bytes())
        .and_then(|_| out.flush())
        .map_err(StoreError::io(path))?;
    Ok(records.len())
}

/// Replace the whole store. Goes through a sibling temp file so readers never
/// see a half-written store.
pub fn write(path: &Path, records: &[Record]) -> Result<(), StoreError> {
    ensure_parent(path)?;

    let mut tmp_name = OsString::from(path.as_os_str());
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    let mut body = header_line();
    for record in records {
        body.push_str(&Schema::Positional.encode_row(record));
    }

    let mut file = File::create(&tmp).map_err(StoreError::io(&tmp))?;
    file.write_all(body.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(StoreError::io(&tmp))?;
    fs::rename(&tmp, path).map_err(StoreError::io(path))
}

/// Read the store, logging and returning nothing on failure
pub fn load_or_empty(path: &Path) -> Vec<Record> {
    match read(path) {
        Ok(records) => {
            log::info!("Read {} records from {}", records.len(), path.display());
            records
        }
        Err(e) => {
            log::warn!("Store unavailable: {}", e);
            Vec::new()
        }
    }
}

/// Rewrite the store, logging failures; `true` on success
pub fn save(path: &Path, records: &[Record]) -> bool {
    match write(path, records) {
        Ok(()) => {
            log::info!("Wrote {} records to {}", records.len(), path.display());
            true
        }
        Err(e) => {
            log::error!("Failed to write store: {}", e);
            false
        }
    }
}

fn ensure_parent(path: &Path) -> Result<(), StoreError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(StoreError::io(dir))
        }
        _ => Ok(()),
    }
}

fn header_line() -> String {
    let mut line = FIELDS.join(&DELIMITER.to_string());
    line.push('\n');
    line
}

// One record per line, delimiter never inside a cell.
fn encode_cell(value: &str) -> String {
    value.replace(DELIMITER, "/").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Vec<Record> {
        vec![
            Record::new("Software Engineering Intern", "https://jobs.example/1")
                .with_organization("Acme")
                .with_location("Paris, France")
                .with_posted_on("2026-10-18"),
            Record::new("Backend Alternance", "https://jobs.example/2")
                .with_organization("Globex")
                .with_location("Berlin")
                .with_posted_on("05 Jan 2024"),
        ]
    }

    #[test]
    fn write_then_read_yields_equal_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("filtered.csv");
        write(&path, &sample()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("organization|title|location|identity_key|posted_on\n"));
        assert_eq!(read(&path).unwrap(), sample());
    }

    #[test]
    fn write_replaces_previous_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("filtered.csv");
        write(&path, &sample()).unwrap();
        write(&path, &sample()[..1]).unwrap();
        assert_eq!(read(&path).unwrap(), sample()[..1].to_vec());
        assert!(!dir.path().join("filtered.csv.tmp").exists());
    }

    #[test]
    fn empty_write_leaves_header_only_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("filtered.csv");
        write(&path, &sample()).unwrap();
        write(&path, &[]).unwrap();
        assert!(read(&path).unwrap().is_empty());
    }

    #[test]
    fn delimiter_and_newlines_are_flattened() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("filtered.csv");
        let record = Record::new("Web | Mobile\nIntern", "https://jobs.example/3");
        write(&path, &[record]).unwrap();

        let back = read(&path).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].title, "Web / Mobile Intern");
        assert_eq!(back[0].identity_key, "https://jobs.example/3");
    }

    #[test]
    fn headerless_file_uses_positional_schema() {
        let content = "Acme|Cloud Intern|Lyon|https://jobs.example/9|2026-10-17\n\
                       Globex|Web Trainee|Nice|https://jobs.example/10|\n";
        let records = parse(content);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].organization, "Acme");
        assert_eq!(records[0].posted_on, "2026-10-17");
        assert_eq!(records[1].identity_key, "https://jobs.example/10");
        assert_eq!(records[1].posted_on, "");
    }

    #[test]
    fn legacy_header_is_mapped_by_name() {
        let content = "date|link|title|extra|company\n\
                       2026-10-19|https://jobs.example/4|Frontend Intern|x|Initech\n";
        let records = parse(content);
        assert_eq!(
            records,
            vec![Record::new("Frontend Intern", "https://jobs.example/4")
                .with_organization("Initech")
                .with_posted_on("2026-10-19")]
        );
    }

    #[test]
    fn short_rows_leave_missing_fields_empty() {
        let records = parse("company|title|location|link|date\nAcme|Cloud Intern\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Cloud Intern");
        assert!(records[0].identity_key.is_empty());
    }

    #[test]
    fn append_writes_header_once_and_injects_date() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        append(&path, &sample()[..1], today).unwrap();
        append(&path, &[Record::new("Cloud Intern", "https://jobs.example/5")], today).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("identity_key").count(), 1);

        let records = read(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], sample()[0]);
        assert_eq!(records[1].posted_on, "2026-10-19");
    }

    #[test]
    fn append_follows_declared_column_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        fs::write(&path, "date|link|title|notes|company\n").unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let record = Record::new("Cloud Intern", "https://jobs.example/b")
            .with_organization("Globex")
            .with_location("Lyon")
            .with_posted_on("2026-10-18");
        append(&path, &[record], today).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("2026-10-18|https://jobs.example/b|Cloud Intern||Globex\n"));
        assert_eq!(
            read(&path).unwrap(),
            vec![Record::new("Cloud Intern", "https://jobs.example/b")
                .with_organization("Globex")
                .with_posted_on("2026-10-18")]
        );
    }

    #[test]
    fn append_after_unterminated_last_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        fs::write(
            &path,
            "organization|title|location|identity_key|posted_on\n\
             Acme|Web Intern|Paris|https://jobs.example/a|2026-10-19",
        )
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        append(&path, &[Record::new("Cloud Intern", "https://jobs.example/b")], today).unwrap();

        let keys: Vec<_> = read(&path).unwrap().into_iter().map(|r| r.identity_key).collect();
        assert_eq!(keys, vec!["https://jobs.example/a", "https://jobs.example/b"]);
    }

    #[test]
    fn append_to_headerless_store_stays_positional() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        fs::write(&path, "Acme|Web Intern|Paris|https://jobs.example/a|2026-10-19\n").unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        append(&path, &sample()[1..], today).unwrap();

        let records = read(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], sample()[1]);
    }

    #[test]
    fn missing_store_loads_as_empty() {
        let dir = tempdir().unwrap();
        assert!(load_or_empty(&dir.path().join("absent.csv")).is_empty());
        assert!(matches!(
            read(&dir.path().join("absent.csv")),
            Err(StoreError::Io { .. })
        ));
    }

    #[test]
    fn unwritable_store_reports_false() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        assert!(!save(&blocker.join("filtered.csv"), &sample()));
    }
}
