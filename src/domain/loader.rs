//! @ai:module:intent Load and save task snapshots (saved `GET /tasks` responses)
//! @ai:module:layer infrastructure
//! @ai:module:public_api SnapshotLoader, SnapshotLoaderTrait
//! @ai:module:stateless true

use crate::domain::task::Task;
use crate::error::{ConsoleError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent Trait for loading task snapshots
pub trait SnapshotLoaderTrait: Send + Sync {
    /// @ai:intent Load tasks from a snapshot file or a directory of snapshots
    fn load(&self, path: &Path) -> Result<Vec<Task>>;

    /// @ai:intent Write tasks as a snapshot file
    fn save(&self, tasks: &[Task], path: &Path) -> Result<()>;
}

/// @ai:intent Reads task collections from JSON files
/// @ai:effects pure (stateless)
pub struct SnapshotLoader;

impl SnapshotLoader {
    /// @ai:intent Create a new snapshot loader
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Parse a snapshot holding either a task list or a single task
    /// @ai:effects fs:read
    fn parse_snapshot_file(path: &Path) -> Result<Vec<Task>> {
        let content = std::fs::read_to_string(path).map_err(|source| ConsoleError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let value: serde_json::Value = serde_json::from_str(&content)?;

        if value.is_array() {
            Ok(serde_json::from_value(value)?)
        } else {
            Ok(vec![serde_json::from_value(value)?])
        }
    }

    /// @ai:intent Find all JSON files in directory, sorted by path
    /// @ai:effects fs:read
    fn find_snapshot_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().map(|ext| ext == "json").unwrap_or(false))
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        files
    }
}

impl Default for SnapshotLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotLoaderTrait for SnapshotLoader {
    /// @ai:intent Load tasks; unreadable files inside a directory are skipped
    /// @ai:effects fs:read
    fn load(&self, path: &Path) -> Result<Vec<Task>> {
        if !path.is_dir() {
            return Self::parse_snapshot_file(path);
        }

        let mut tasks = Vec::new();

        for file in Self::find_snapshot_files(path) {
            match Self::parse_snapshot_file(&file) {
                Ok(mut parsed) => tasks.append(&mut parsed),
                Err(e) => {
                    tracing::warn!("Skipping invalid snapshot {}: {}", file.display(), e);
                }
            }
        }

        Ok(tasks)
    }

    /// @ai:intent Write tasks as pretty JSON
    /// @ai:effects fs:write
    fn save(&self, tasks: &[Task], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(tasks)?;
        std::fs::write(path, json)?;
        tracing::info!("Saved {} tasks to {}", tasks.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{dialogue, task_with};
    use crate::domain::ConversationStatus;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("snapshots").join("tasks.json");
        let tasks = vec![task_with(
            "Cold outreach",
            vec![dialogue(ConversationStatus::Completed, &[])],
        )];

        let loader = SnapshotLoader::new();
        loader.save(&tasks, &path).unwrap();

        let loaded = loader.load(&path).unwrap();
        assert_eq!(loaded, tasks);
    }

    #[test]
    fn test_load_single_task_object() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("task.json");
        let task = task_with("Single", vec![]);
        std::fs::write(&path, serde_json::to_string(&task).unwrap()).unwrap();

        let loaded = SnapshotLoader::new().load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "Single");
    }

    #[test]
    fn test_load_directory_skips_invalid_files() {
        let temp = TempDir::new().unwrap();
        let loader = SnapshotLoader::new();

        loader.save(&[task_with("a", vec![])], &temp.path().join("a.json")).unwrap();
        loader.save(&[task_with("b", vec![])], &temp.path().join("nested").join("b.json")).unwrap();
        std::fs::write(temp.path().join("broken.json"), "{ not json").unwrap();
        std::fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let loaded = loader.load(temp.path()).unwrap();
        let titles: Vec<_> = loaded.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn test_load_keeps_valid_dialogues_next_to_malformed_ones() {
        use crate::domain::RadarMetric;
        use crate::metrics::{MetricsAggregator, MetricsAggregatorTrait};

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.json");

        let task = task_with(
            "Partial",
            vec![dialogue(ConversationStatus::Completed, &[(RadarMetric::Persuasion, 3.0)])],
        );
        let mut value = serde_json::to_value(vec![task]).unwrap();
        let mut broken = value[0]["dialogues"][0].clone();
        broken["timestamp"] = serde_json::json!("");
        value[0]["dialogues"].as_array_mut().unwrap().push(broken);
        std::fs::write(&path, value.to_string()).unwrap();

        let loaded = SnapshotLoader::new().load(&path).unwrap();
        assert_eq!(loaded[0].dialogues.len(), 1);

        let aggregator = MetricsAggregator::new();
        assert_eq!(aggregator.aggregate(&loaded)[&RadarMetric::Persuasion], 3.0);
        assert_eq!(aggregator.conversion_rate(&loaded), 100.0);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = SnapshotLoader::new()
            .load(Path::new("/nonexistent/tasks.json"))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tasks.json"));
    }
}
