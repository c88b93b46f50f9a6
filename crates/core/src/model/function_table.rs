use serde::{Deserialize, Serialize};

/// Placeholder shown when an id has no resolvable name. A lookup miss is a
/// collaborator problem (symbolization), never a reason to abort layout.
const UNKNOWN: &str = "??";

/// One entry in the function table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionEntry {
    pub name: String,
    pub library_id: u32,
}

/// Resolves function ids to names and owning libraries.
///
/// Built by the report loader (a collaborator); the engine only reads it
/// when producing tooltip titles and labels in the detail pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionTable {
    functions: Vec<FunctionEntry>,
    libraries: Vec<String>,
}

impl FunctionTable {
    pub fn new(functions: Vec<FunctionEntry>, libraries: Vec<String>) -> Self {
        Self {
            functions,
            libraries,
        }
    }

    pub fn function_name(&self, function_id: u32) -> &str {
        self.functions
            .get(function_id as usize)
            .map_or(UNKNOWN, |f| f.name.as_str())
    }

    pub fn library_name(&self, function_id: u32) -> &str {
        self.functions
            .get(function_id as usize)
            .and_then(|f| self.libraries.get(f.library_id as usize))
            .map_or(UNKNOWN, String::as_str)
    }

    /// Tooltip title for a frame: `function | library (N events: weight)`.
    ///
    /// This exact shape is what search matches against, so it is built here
    /// rather than in each renderer.
    pub fn frame_title(&self, function_id: u32, subtree_events: u64, weight: &str) -> String {
        format!(
            "{} | {} ({} events: {})",
            self.function_name(function_id),
            self.library_name(function_id),
            subtree_events,
            weight
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> FunctionTable {
        FunctionTable::new(
            vec![
                FunctionEntry {
                    name: "main".into(),
                    library_id: 0,
                },
                FunctionEntry {
                    name: "art::Monitor::Lock".into(),
                    library_id: 1,
                },
            ],
            vec!["/system/bin/app".into(), "/system/lib64/libart.so".into()],
        )
    }

    #[test]
    fn resolves_names_and_libraries() {
        let t = table();
        assert_eq!(t.function_name(1), "art::Monitor::Lock");
        assert_eq!(t.library_name(1), "/system/lib64/libart.so");
    }

    #[test]
    fn missing_ids_get_placeholder() {
        let t = table();
        assert_eq!(t.function_name(99), "??");
        assert_eq!(t.library_name(99), "??");
    }

    #[test]
    fn frame_title_shape() {
        let t = table();
        assert_eq!(
            t.frame_title(0, 4, "0.28%"),
            "main | /system/bin/app (4 events: 0.28%)"
        );
    }
}
