// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Persistent pattern storage.
//!
//! Patterns are stored per controller in a single JSON document and are shared across all zones
//! of the controller. The document is rewritten on every change.

use crate::errors::ServiceError;
use crate::pattern::model::Pattern;
use log::{debug, info, warn};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum number of stored patterns per controller.
pub const MAX_PATTERNS: usize = 200;
/// File name prefix of the pattern document.
pub const STORAGE_KEY_PATTERNS: &str = "oelo_lights_patterns";

/// Result of [`PatternStore::add_pattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// New pattern stored.
    Added,
    /// Pattern already existed, its name has been updated.
    Renamed,
    /// Pattern already existed with the same name, nothing changed.
    AlreadyExists,
    /// Maximum number of patterns reached, nothing changed.
    LimitReached,
}

/// Result of [`PatternStore::rename_pattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,
    NotFound,
    /// Another pattern already uses the requested name.
    NameConflict,
}

#[derive(serde::Serialize)]
struct PatternDocument<'a> {
    patterns: &'a [Pattern],
}

/// JSON file backed pattern collection of one controller.
pub struct PatternStore {
    path: PathBuf,
    /// Loaded patterns, `None` until first access.
    patterns: Option<Vec<Pattern>>,
}

impl PatternStore {
    /// Create a pattern store for the given controller configuration entry.
    ///
    /// The document is located at `{storage_dir}/oelo_lights_patterns_{entry_id}.json`.
    pub fn new(storage_dir: impl AsRef<Path>, entry_id: &str) -> Self {
        let file = format!("{STORAGE_KEY_PATTERNS}_{entry_id}.json");
        Self::at_path(storage_dir.as_ref().join(file))
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            patterns: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the patterns from storage if not yet loaded.
    fn load(&mut self) -> Result<&mut Vec<Pattern>, ServiceError> {
        if self.patterns.is_none() {
            let patterns = self.read_document()?;
            debug!("Loaded {} patterns from {:?}", patterns.len(), self.path);
            self.patterns = Some(patterns);
        }
        Ok(self.patterns.get_or_insert_with(Vec::new))
    }

    fn read_document(&self) -> Result<Vec<Pattern>, ServiceError> {
        if !self.path.is_file() {
            info!("No pattern storage found at {:?}", self.path);
            return Ok(Vec::new());
        }

        let data = fs::read_to_string(&self.path)?;
        let document: Value = serde_json::from_str(&data)?;
        let Some(entries) = document.get("patterns").and_then(|p| p.as_array()) else {
            warn!("Invalid pattern storage document {:?}, ignoring content", self.path);
            return Ok(Vec::new());
        };

        let patterns = entries
            .iter()
            .filter_map(|entry| match serde_json::from_value::<Pattern>(entry.clone()) {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!("Ignoring invalid stored pattern {entry}: {e}");
                    None
                }
            })
            .collect();
        Ok(patterns)
    }

    /// Write the complete document. A temporary file is renamed to the target file.
    fn save(&self) -> Result<(), ServiceError> {
        let patterns = self.patterns.as_deref().unwrap_or_default();
        let content = serde_json::to_string_pretty(&PatternDocument { patterns })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.path)?;
        debug!("Saved {} patterns to {:?}", patterns.len(), self.path);
        Ok(())
    }

    /// Persist the cached patterns.
    ///
    /// On failure the cache is dropped, so the next access reloads the last saved document.
    fn commit(&mut self) -> Result<(), ServiceError> {
        if let Err(e) = self.save() {
            warn!("Discarding unsaved pattern changes: {e}");
            self.invalidate();
            return Err(e);
        }
        Ok(())
    }

    /// Add a pattern.
    ///
    /// If a pattern with the same id already exists, only its name is updated, if the new
    /// pattern has a non-empty name different to the existing one. An empty name of a new pattern
    /// defaults to the pattern id.
    pub fn add_pattern(&mut self, mut pattern: Pattern) -> Result<AddOutcome, ServiceError> {
        let patterns = self.load()?;

        if let Some(existing) = patterns.iter_mut().find(|p| p.id == pattern.id) {
            let name = pattern.name.trim();
            if name.is_empty() || name == existing.name {
                debug!("Pattern '{}' already exists", pattern.id);
                return Ok(AddOutcome::AlreadyExists);
            }
            debug!(
                "Pattern '{}' already exists, updating name '{}' -> '{name}'",
                pattern.id, existing.name
            );
            existing.name = name.to_string();
            self.commit()?;
            return Ok(AddOutcome::Renamed);
        }

        if patterns.len() >= MAX_PATTERNS {
            warn!("Pattern limit reached ({MAX_PATTERNS}), cannot add more patterns");
            return Ok(AddOutcome::LimitReached);
        }

        pattern.name = pattern.name.trim().to_string();
        if pattern.name.is_empty() {
            pattern.name = pattern.id.clone();
        }
        patterns.push(pattern);
        self.commit()?;
        Ok(AddOutcome::Added)
    }

    fn position(patterns: &[Pattern], id: Option<&str>, name: Option<&str>) -> Option<usize> {
        id.and_then(|id| patterns.iter().position(|p| p.id == id))
            .or_else(|| name.and_then(|name| patterns.iter().position(|p| p.name == name)))
    }

    /// Get a pattern by id, or by name if not found by id.
    pub fn get_pattern(
        &mut self,
        id: Option<&str>,
        name: Option<&str>,
    ) -> Result<Option<Pattern>, ServiceError> {
        let patterns = self.load()?;
        Ok(Self::position(patterns, id, name).map(|idx| patterns[idx].clone()))
    }

    /// Rename a pattern identified by id or name.
    ///
    /// The new name must not be used by another pattern.
    pub fn rename_pattern(
        &mut self,
        id: Option<&str>,
        name: Option<&str>,
        new_name: &str,
    ) -> Result<RenameOutcome, ServiceError> {
        let patterns = self.load()?;
        let Some(idx) = Self::position(patterns, id, name) else {
            return Ok(RenameOutcome::NotFound);
        };

        if patterns
            .iter()
            .enumerate()
            .any(|(i, p)| i != idx && p.name == new_name)
        {
            warn!("Pattern name '{new_name}' already exists");
            return Ok(RenameOutcome::NameConflict);
        }

        patterns[idx].name = new_name.to_string();
        self.commit()?;
        Ok(RenameOutcome::Renamed)
    }

    /// Delete a pattern identified by id or name.
    ///
    /// Returns `false` if no pattern matched.
    pub fn delete_pattern(
        &mut self,
        id: Option<&str>,
        name: Option<&str>,
    ) -> Result<bool, ServiceError> {
        let patterns = self.load()?;
        let Some(idx) = Self::position(patterns, id, name) else {
            return Ok(false);
        };

        let removed = patterns.remove(idx);
        debug!("Deleted pattern '{}' ({})", removed.name, removed.id);
        self.commit()?;
        Ok(true)
    }

    /// All stored patterns.
    pub fn list_patterns(&mut self) -> Result<Vec<Pattern>, ServiceError> {
        Ok(self.load()?.clone())
    }

    /// Drop the cached patterns. The next access reloads the document.
    fn invalidate(&mut self) {
        self.patterns = None;
    }
}
