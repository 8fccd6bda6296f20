//! Conference dataset schema and the bundled sample data.

use rusqlite::Connection;

pub const SCHEMA_VERSION: i64 = 1;

/// Create the tables if they do not exist yet
pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        BEGIN;
        CREATE TABLE IF NOT EXISTS meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS type (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS author (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS content (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            abstract TEXT,
            type INTEGER NOT NULL,
            FOREIGN KEY(type) REFERENCES type(id)
        );

        CREATE TABLE IF NOT EXISTS content_has_author (
            content INTEGER NOT NULL,
            author INTEGER NOT NULL,
            PRIMARY KEY (content, author),
            FOREIGN KEY(content) REFERENCES content(id) ON DELETE CASCADE,
            FOREIGN KEY(author) REFERENCES author(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_content_has_author_author ON content_has_author(author);

        CREATE TABLE IF NOT EXISTS award (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS content_has_award (
            content INTEGER PRIMARY KEY,
            award INTEGER NOT NULL,
            FOREIGN KEY(content) REFERENCES content(id) ON DELETE CASCADE,
            FOREIGN KEY(award) REFERENCES award(id)
        );

        CREATE INDEX IF NOT EXISTS idx_content_has_award_award ON content_has_award(award);
        COMMIT;
        ",
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO meta (key, value) VALUES ('schema_version', ?1)",
        [SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}

/// Insert a small sample of the conference dataset. Existing rows with the
/// same ids are left untouched.
pub fn seed_sample(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        BEGIN;
        INSERT OR IGNORE INTO type (id, name) VALUES
            (1, 'Paper'),
            (2, 'Late-Breaking Work'),
            (3, 'Interactivity');

        INSERT OR IGNORE INTO author (id, name) VALUES
            (1, 'Amara Okafor'),
            (2, 'Bjorn Lindqvist'),
            (3, 'Chen Wei'),
            (4, 'Daniela Ruiz'),
            (5, 'Eitan Levi'),
            (6, 'Fatima Zahra'),
            (7, 'Gareth Morgan'),
            (8, 'Hana Sato'),
            (9, 'Ines Duarte'),
            (10, 'Jonas Weber'),
            (11, 'Kavya Iyer'),
            (12, 'Liam O''Connor');

        INSERT OR IGNORE INTO content (id, title, abstract, type) VALUES
            (1, 'Designing Calm Interfaces for Shared Homes',
                'A field study of ambient displays in multi-occupant households.', 1),
            (2, 'Haptic Cues for Wayfinding in Virtual Reality',
                'We compare vibrotactile and visual guidance for navigation.', 1),
            (3, 'Voice Assistants and Older Adults',
                'Interviews exploring trust and routine with smart speakers.', 2),
            (4, 'Paper Prototyping at Scale',
                'A toolkit for running low-fidelity design sessions remotely.', 3),
            (5, 'Accessible Charts for Screen Reader Users',
                'Sonification and structured navigation of data visualisations.', 1),
            (6, 'Gesture Typing on Smartwatches',
                'Evaluating shape-writing keyboards on very small screens.', 2);

        INSERT OR IGNORE INTO content_has_author (content, author) VALUES
            (1, 1), (1, 2),
            (2, 2), (2, 3), (2, 4),
            (3, 5),
            (4, 6), (4, 7),
            (5, 1), (5, 8), (5, 9),
            (6, 10), (6, 11), (6, 12);

        INSERT OR IGNORE INTO award (id, name) VALUES
            (1, 'Best Paper'),
            (2, 'Honourable Mention'),
            (3, 'Best Interactivity');

        INSERT OR IGNORE INTO content_has_award (content, award) VALUES
            (1, 1),
            (5, 2);
        COMMIT;
        ",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();

        let version: String = conn
            .query_row("SELECT value FROM meta WHERE key = 'schema_version'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION.to_string());
    }

    #[test]
    fn test_seed_sample_twice() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        seed_sample(&conn).unwrap();
        seed_sample(&conn).unwrap();

        assert_eq!(count(&conn, "author"), 12);
        assert_eq!(count(&conn, "content"), 6);
        assert_eq!(count(&conn, "award"), 3);
        assert_eq!(count(&conn, "content_has_award"), 2);
    }
}
