/// Inline SQL migrations for the oura-view database schema.
///
/// We use simple inline migrations rather than sqlx migration files
/// because the schema is small and self-contained. The three base tables
/// mirror the vendor collections; the derived analysis table is created
/// separately on every run.
pub const MIGRATIONS: &[&str] = &[
    // Migration 1: sleep table (scalar summary columns; nested sample
    // series stay in the persisted JSON for the time-series view)
    r#"
CREATE TABLE IF NOT EXISTS sleep (
    id TEXT PRIMARY KEY,
    day TEXT NOT NULL,
    bedtime_start TEXT,
    bedtime_end TEXT,
    average_heart_rate REAL,
    average_hrv REAL,
    total_sleep_duration INTEGER,
    efficiency INTEGER
);
"#,
    // Migration 2: sleep_score table; previous_day is filled by the
    // per-row transform after ingest
    r#"
CREATE TABLE IF NOT EXISTS sleep_score (
    id TEXT PRIMARY KEY,
    day TEXT NOT NULL,
    score INTEGER NOT NULL,
    timestamp TEXT,
    previous_day TEXT
);
"#,
    // Migration 3: tags table
    r#"
CREATE TABLE IF NOT EXISTS tags (
    id TEXT PRIMARY KEY,
    start_day TEXT NOT NULL,
    start_time TEXT,
    end_day TEXT,
    end_time TEXT,
    comment TEXT,
    tag_type_code TEXT,
    custom_name TEXT
);
"#,
    // Migration 4: join/group indexes
    r#"
CREATE INDEX IF NOT EXISTS idx_sleep_score_previous_day ON sleep_score(previous_day);
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_tags_start_day ON tags(start_day);
"#,
];
