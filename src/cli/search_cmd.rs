//! Search CLI subcommands: tag, name, path.

use std::collections::BTreeSet;
use std::path::Path;

use super::models_cmd::{emit, print_record};
use super::{EXIT_FAILURE, EXIT_OK, EXIT_USAGE};
use crate::models::{BaseModelType, ModelConfigStore, ModelQuery, ModelType};

/// Split a comma-separated tag list, dropping blanks.
pub fn parse_tags(list: &str) -> BTreeSet<String> {
    list.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build a query from optional CLI filter strings.
pub fn build_query(
    name: Option<&str>,
    base: Option<&str>,
    model_type: Option<&str>,
) -> Result<ModelQuery, String> {
    let mut query = ModelQuery::new();
    if let Some(name) = name {
        query = query.name(name);
    }
    if let Some(base) = base {
        query = query.base_model(base.parse::<BaseModelType>().map_err(|e| e.to_string())?);
    }
    if let Some(model_type) = model_type {
        query = query.model_type(model_type.parse::<ModelType>().map_err(|e| e.to_string())?);
    }
    Ok(query)
}

/// Run `search tag <t1,t2,...>`.
pub fn run_tag(store: &dyn ModelConfigStore, tags: &str, json: bool) -> i32 {
    match store.search_by_tag(&parse_tags(tags)) {
        Ok(models) => {
            emit(&models, json);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

/// Run `search name [--name N] [--base B] [--type T]`.
pub fn run_name(
    store: &dyn ModelConfigStore,
    name: Option<&str>,
    base: Option<&str>,
    model_type: Option<&str>,
    json: bool,
) -> i32 {
    let query = match build_query(name, base, model_type) {
        Ok(q) => q,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return EXIT_USAGE;
        }
    };
    match store.search_by_name(&query) {
        Ok(models) => {
            emit(&models, json);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

/// Run `search path <path>`. Exits 1 when no record has that path.
pub fn run_path(store: &dyn ModelConfigStore, path: &Path, json: bool) -> i32 {
    match store.search_by_path(path) {
        Ok(Some(model)) => {
            print_record(&model, json);
            EXIT_OK
        }
        Ok(None) => {
            eprintln!("No model with path {}", path.display());
            EXIT_FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ModelConfig, ModelFormat, YamlModelStore};
    use tempfile::TempDir;

    #[test]
    fn test_parse_tags() {
        let tags = parse_tags(" sfw, ,anime,sfw ");
        assert_eq!(tags.len(), 2);
        assert!(tags.contains("anime"));
    }

    #[test]
    fn test_build_query_rejects_unknown_base() {
        assert!(build_query(None, Some("sd-9"), None).is_err());
        let q = build_query(Some("x"), Some("sd-2"), Some("vae")).unwrap();
        assert_eq!(q.base_model, Some(BaseModelType::StableDiffusion2));
        assert_eq!(q.model_type, Some(ModelType::Vae));
    }

    #[test]
    fn test_search_commands() {
        let dir = TempDir::new().unwrap();
        let store = YamlModelStore::open(dir.path().join("models.yaml")).unwrap();
        let record = ModelConfig::new(
            "depth",
            BaseModelType::StableDiffusion1,
            ModelType::ControlNet,
            ModelFormat::Diffusers,
            "/models/depth",
        )
        .with_tags(["control"]);
        store.add("cn", record.into()).unwrap();

        assert_eq!(run_tag(&store, "control", false), EXIT_OK);
        assert_eq!(run_name(&store, None, Some("sd-1"), None, true), EXIT_OK);
        assert_eq!(run_name(&store, None, Some("bogus"), None, true), EXIT_USAGE);
        assert_eq!(run_path(&store, Path::new("/models/depth"), false), EXIT_OK);
        assert_eq!(run_path(&store, Path::new("/models/none"), false), EXIT_FAILURE);
    }
}
