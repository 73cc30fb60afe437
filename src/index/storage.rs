//! On-disk layout of a persisted index.
//!
//! An index directory contains a single SQLite database, `index.db`, with a
//! `documents` table (one row per document, ordered by `position`) and a
//! key/value `manifest` table. Embeddings are stored as little-endian `f32`
//! blobs.

use super::{IndexManifest, IndexedDocument};
use crate::corpus::CitationMetadata;
use crate::error::{PitstopError, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

/// Database file name inside the index directory.
pub const INDEX_FILE: &str = "index.db";

const SCHEMA: &str = r#"
    DROP TABLE IF EXISTS documents;
    DROP TABLE IF EXISTS manifest;

    CREATE TABLE documents (
        position INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        link TEXT NOT NULL,
        channel TEXT NOT NULL,
        channel_link TEXT NOT NULL,
        transcript TEXT NOT NULL,
        embedding BLOB NOT NULL
    );

    CREATE TABLE manifest (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
"#;

/// Write `documents` and `manifest` into `dir`, replacing previous contents.
pub fn write(dir: &Path, manifest: &IndexManifest, documents: &[IndexedDocument]) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let conn = Connection::open(dir.join(INDEX_FILE))?;

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(SCHEMA)?;

    for (position, doc) in documents.iter().enumerate() {
        tx.execute(
            r#"
            INSERT INTO documents (position, title, link, channel, channel_link, transcript, embedding)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                position as i64,
                doc.page_content,
                doc.metadata.link,
                doc.metadata.channel,
                doc.metadata.channel_link,
                doc.metadata.transcript,
                embedding_to_bytes(&doc.embedding),
            ],
        )?;
    }

    for (key, value) in [
        ("embedding_model", manifest.embedding_model.clone()),
        ("dimensions", manifest.dimensions.to_string()),
        ("built_at", manifest.built_at.to_rfc3339()),
    ] {
        tx.execute(
            "INSERT INTO manifest (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
    }

    tx.commit()?;
    debug!("Wrote {} documents to {:?}", documents.len(), dir);
    Ok(())
}

/// Read the manifest and all documents from `dir`.
pub fn read(dir: &Path) -> Result<(IndexManifest, Vec<IndexedDocument>)> {
    let path = dir.join(INDEX_FILE);
    if !path.is_file() {
        return Err(PitstopError::Index(format!(
            "{:?} is not an index directory (missing {})",
            dir, INDEX_FILE
        )));
    }

    let conn = Connection::open(&path)?;
    let manifest = read_manifest(&conn)?;

    let mut stmt = conn.prepare(
        r#"
        SELECT title, link, channel, channel_link, transcript, embedding
        FROM documents
        ORDER BY position
        "#,
    )?;

    let rows = stmt.query_map([], |row| {
        let embedding_bytes: Vec<u8> = row.get(5)?;
        Ok(IndexedDocument {
            page_content: row.get(0)?,
            metadata: CitationMetadata {
                link: row.get(1)?,
                channel: row.get(2)?,
                channel_link: row.get(3)?,
                transcript: row.get(4)?,
            },
            embedding: bytes_to_embedding(&embedding_bytes),
        })
    })?;

    let documents = rows.collect::<std::result::Result<Vec<_>, _>>()?;
    debug!("Read {} documents from {:?}", documents.len(), dir);
    Ok((manifest, documents))
}

fn read_manifest(conn: &Connection) -> Result<IndexManifest> {
    let get = |key: &str| -> Result<String> {
        conn.query_row(
            "SELECT value FROM manifest WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| PitstopError::Index(format!("Index manifest is missing '{}'", key)))
    };

    let dimensions = get("dimensions")?
        .parse()
        .map_err(|e| PitstopError::Index(format!("Invalid dimensions in manifest: {}", e)))?;
    let built_at = DateTime::parse_from_rfc3339(&get("built_at")?)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PitstopError::Index(format!("Invalid build time in manifest: {}", e)))?;

    Ok(IndexManifest {
        embedding_model: get("embedding_model")?,
        dimensions,
        built_at,
    })
}

/// Serialize embedding to bytes.
fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Deserialize embedding from bytes.
fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}
