//! SQL schema for the Checkee SQLite store.
//!
//! The tables are written by the external ingestion pipeline; this crate only
//! creates them if missing so a fresh file is immediately queryable.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per scraping run. Several runs may share a month.
CREATE TABLE IF NOT EXISTS snapshots (
    snapshot_id   TEXT PRIMARY KEY,
    scrape_date   TEXT NOT NULL,   -- ISO 8601 UTC
    month         TEXT NOT NULL,   -- 'YYYY-MM'
    total_records INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL
);

-- A case as it appeared in one snapshot. Rows for the same case in
-- different snapshots share only `casenum`.
CREATE TABLE IF NOT EXISTS records (
    record_id     TEXT PRIMARY KEY,
    snapshot_id   TEXT NOT NULL REFERENCES snapshots(snapshot_id),
    casenum       TEXT NOT NULL,
    user_id       TEXT,
    visa_type     TEXT,
    visa_entry    TEXT,
    consulate     TEXT,
    major         TEXT,
    status        TEXT,
    check_date    TEXT,            -- 'YYYY-MM-DD' or NULL
    complete_date TEXT,            -- 'YYYY-MM-DD' or NULL
    waiting_days  INTEGER,
    details_link  TEXT,
    has_notes     INTEGER NOT NULL DEFAULT 0,
    note          TEXT,
    month         TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

-- Append-only change log.
CREATE TABLE IF NOT EXISTS changes (
    change_id       TEXT PRIMARY KEY,
    casenum         TEXT NOT NULL,
    snapshot_id_old TEXT REFERENCES snapshots(snapshot_id),
    snapshot_id_new TEXT NOT NULL REFERENCES snapshots(snapshot_id),
    change_type     TEXT NOT NULL,
    field_name      TEXT,
    old_value       TEXT,
    new_value       TEXT,
    detected_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS snapshots_month_idx    ON snapshots(month, julianday(scrape_date));
CREATE INDEX IF NOT EXISTS records_snapshot_idx   ON records(snapshot_id);
CREATE INDEX IF NOT EXISTS records_casenum_idx    ON records(casenum);
CREATE INDEX IF NOT EXISTS changes_detected_idx   ON changes(julianday(detected_at));
CREATE INDEX IF NOT EXISTS changes_casenum_idx    ON changes(casenum);

PRAGMA user_version = 1;
";
