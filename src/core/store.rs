//! Flat-file persistence for the three entity collections
//!
//! Each kind lives in its own pretty-printed JSON array (`users.json`,
//! `projects.json`, `tasks.json`). Everything is loaded at the start of a
//! command and only the collections the command changed are written back.
//! There is no locking: two processes writing at once means last writer wins.

use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::entity::{decode_record, Entity, ModelError};
use crate::core::identity::{EntityKind, IdAllocator};
use crate::core::tracker::Tracker;

/// Errors reading or writing the data directory
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path:?} is not a valid JSON array of records: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode records for {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("bad record #{index} in {path:?}: {source}")]
    Record {
        path: PathBuf,
        index: usize,
        #[source]
        source: ModelError,
    },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A directory holding the three JSON documents
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The data directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the document holding `kind`
    pub fn document_path(&self, kind: EntityKind) -> PathBuf {
        self.dir.join(kind.document_name())
    }

    /// Load all three collections, seeding the allocator from every record
    pub fn load(&self) -> Result<Tracker, StoreError> {
        let mut ids = IdAllocator::new();
        let users = self.load_collection(&mut ids)?;
        let projects = self.load_collection(&mut ids)?;
        let tasks = self.load_collection(&mut ids)?;
        Ok(Tracker::from_parts(users, projects, tasks, ids))
    }

    /// Load one collection. A missing document is an empty collection.
    pub fn load_collection<T: Entity>(&self, ids: &mut IdAllocator) -> Result<Vec<T>, StoreError> {
        let path = self.document_path(T::KIND);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "document missing, starting empty");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).map_err(io_error(&path))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<Value> =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?;

        let items = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                decode_record::<T>(record, ids).map_err(|source| StoreError::Record {
                    path: path.clone(),
                    index,
                    source,
                })
            })
            .collect::<Result<Vec<T>, _>>()?;

        tracing::debug!(kind = %T::KIND, count = items.len(), "loaded collection");
        Ok(items)
    }

    /// Write every collection the tracker marks as changed, then mark it clean.
    ///
    /// All changed documents are written to temporary siblings first and only
    /// renamed into place once every one of them was written successfully.
    pub fn save(&self, tracker: &mut Tracker) -> Result<Vec<EntityKind>, StoreError> {
        let dirty = tracker.dirty_kinds();
        if dirty.is_empty() {
            tracing::debug!("nothing changed, skipping write");
            return Ok(dirty);
        }

        fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;

        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::new();
        for &kind in &dirty {
            let target = self.document_path(kind);
            let rendered = match kind {
                EntityKind::User => render(tracker.users()),
                EntityKind::Project => render(tracker.projects()),
                EntityKind::Task => render(tracker.tasks()),
            };
            let content = match rendered {
                Ok(content) => content,
                Err(source) => {
                    discard(&staged);
                    return Err(StoreError::Encode {
                        path: target,
                        source,
                    });
                }
            };
            let temp = target.with_extension("json.tmp");
            if let Err(e) = fs::write(&temp, content) {
                discard(&staged);
                let _ = fs::remove_file(&temp);
                return Err(io_error(&temp)(e));
            }
            staged.push((temp, target));
        }

        for (temp, target) in &staged {
            fs::rename(temp, target).map_err(io_error(target))?;
            tracing::debug!(path = %target.display(), "wrote document");
        }

        tracker.mark_clean();
        Ok(dirty)
    }
}

fn render<T: Entity>(items: &[T]) -> Result<String, serde_json::Error> {
    let records: Vec<T::Record> = items.iter().map(Entity::to_record).collect();
    let mut content = serde_json::to_string_pretty(&records)?;
    content.push('\n');
    Ok(content)
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (temp, _) in staged {
        let _ = fs::remove_file(temp);
    }
}
