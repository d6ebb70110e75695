use crate::error::{QuizError, Result};
use crate::types::config::QuizscoreConfig;
use crate::types::formula::ScoringFormula;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "quizscore.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".quizscore/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/quizscore/config.toml";

pub fn load_config(root: &Path) -> Result<Option<QuizscoreConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<QuizscoreConfig>> {
    let project_path = root.join(DEFAULT_CONFIG_FILE);
    if !project_path.exists() {
        return Ok(None);
    }

    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &project_path)?;
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;

    let cfg: QuizscoreConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| QuizError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(Some(cfg))
}

pub fn load_formula(path: &Path) -> Result<ScoringFormula> {
    if !path.exists() {
        return Err(QuizError::PathNotFound(path.display().to_string()));
    }
    let value = read_toml_value(path)?;
    value
        .try_into()
        .map_err(|e: toml::de::Error| QuizError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| QuizError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::formula::{Aggregation, TopKMethod};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_config_returns_none_when_project_file_missing() {
        let dir = TempDir::new().expect("temp dir should be created");
        let cfg = load_config_with_global(dir.path(), None).expect("load should not fail");
        assert!(cfg.is_none());
    }

    #[test]
    fn load_config_merges_global_project_and_local_in_order() {
        let root = TempDir::new().expect("root temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");

        fs::write(
            &global_path,
            r#"
[scoring]
aggregation = "average"

[generation]
command = "global-llm"
question_count = 3
"#,
        )
        .expect("global config should write");

        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[scoring]
id = "team"

[scoring.top_k_highlight]
method = "fixed_top_3"

[generation]
command = "project-llm"
"#,
        )
        .expect("project config should write");

        fs::create_dir_all(root.path().join(".quizscore")).expect("local dir should create");
        fs::write(
            root.path().join(DEFAULT_LOCAL_FILE),
            r#"
[scoring]
aggregation = "weighted"
"#,
        )
        .expect("local override should write");

        let cfg = load_config_with_global(root.path(), Some(&global_path))
            .expect("load should succeed")
            .expect("merged config should exist");

        let formula = cfg.formula();
        assert_eq!(formula.id, "team");
        assert_eq!(formula.aggregation, Aggregation::Weighted);
        assert_eq!(formula.top_k_highlight.method, TopKMethod::FixedTop(3));
        assert_eq!(cfg.question_count(), 3);
        assert_eq!(
            cfg.generation
                .as_ref()
                .and_then(|generation| generation.command.as_deref()),
            Some("project-llm")
        );
    }

    #[test]
    fn load_config_rejects_invalid_merged_formula() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[scoring.tie_breaking]
priority = ["feeling", "feeling"]
"#,
        )
        .expect("project config should write");

        let err = load_config_with_global(root.path(), None).expect_err("load should fail");
        assert!(matches!(err, QuizError::ConfigParse(_)));
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn load_formula_reads_partial_file() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("formula.toml");
        fs::write(
            &path,
            r#"
id = "thresholded"

[top_k_highlight]
method = "threshold"
threshold = 70
"#,
        )
        .expect("formula should write");
        let formula = load_formula(&path).expect("formula should load");
        assert_eq!(formula.id, "thresholded");
        assert_eq!(formula.top_k_highlight.method, TopKMethod::Threshold);
        assert!(formula.blur_non_top);
    }

    #[test]
    fn load_formula_reports_missing_path() {
        let dir = TempDir::new().expect("temp dir should be created");
        let err = load_formula(&dir.path().join("nope.toml")).expect_err("missing file");
        assert!(matches!(err, QuizError::PathNotFound(_)));
    }
}
