use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use yaml_rust2::{Yaml, YamlLoader};

const INCLUDE_DIRECTIVE: &str = "!include";

/// Loads a YAML file, resolving `!include <path>` lines relative to the file.
///
/// Included documents are merged first; keys in the including file win.
pub fn load_yaml_with_includes(path: &Path) -> Result<Yaml, Box<dyn Error + Send + Sync>> {
    process_includes_recursive(&path.to_path_buf(), &mut Vec::new())
}

fn process_includes_recursive(
    path: &PathBuf,
    stack: &mut Vec<PathBuf>,
) -> Result<Yaml, Box<dyn Error + Send + Sync>> {
    if stack.contains(path) {
        return Err(format!("Include cycle detected at {}", path.display()).into());
    }
    stack.push(path.clone());

    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let base_path = path.parent().unwrap_or(Path::new(""));

    let (includes, rest): (Vec<&str>, Vec<&str>) = contents
        .lines()
        .partition(|&line| line.trim().starts_with(INCLUDE_DIRECTIVE));

    let mut merged_includes: Option<Yaml> = None;
    for line in includes {
        let include_path = line.trim()[INCLUDE_DIRECTIVE.len()..].trim();
        let included = process_includes_recursive(&base_path.join(include_path), stack)?;
        merged_includes = Some(match merged_includes {
            Some(acc) => merge_yaml(&acc, &included),
            None => included,
        });
    }

    let merged_rest = YamlLoader::load_from_str(&rest.join("\n"))?
        .into_iter()
        .reduce(|acc, doc| merge_yaml(&acc, &doc))
        .unwrap_or(Yaml::Null);

    stack.pop();

    Ok(match merged_includes {
        Some(includes) => merge_yaml(&includes, &merged_rest),
        None => merged_rest,
    })
}

fn merge_yaml(base: &Yaml, override_yaml: &Yaml) -> Yaml {
    match (base, override_yaml) {
        (Yaml::Hash(base_hash), Yaml::Hash(override_hash)) => {
            let mut result = base_hash.clone();
            for (key, value) in override_hash {
                let merged = match base_hash.get(key) {
                    Some(base_value) => merge_yaml(base_value, value),
                    None => value.clone(),
                };
                result.insert(key.clone(), merged);
            }
            Yaml::Hash(result)
        }
        (base_value, Yaml::Null) => base_value.clone(),
        (_, override_value) => override_value.clone(),
    }
}
