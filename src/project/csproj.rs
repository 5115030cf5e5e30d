// ABOUTME: MSBuild project file parsing.
// ABOUTME: Reads the assembly name and target framework from the PropertyGroup elements.

use quick_xml::de::from_str;
use serde::Deserialize;

/// Properties of a `.csproj` that decide what gets built and launched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectProperties {
    pub assembly_name: Option<String>,
    /// The single framework, or the first of a multi-targeted project.
    pub target_framework: Option<String>,
    /// Every framework listed in `TargetFrameworks`, in file order.
    pub target_frameworks: Vec<String>,
}

impl ProjectProperties {
    /// Parse project XML. Comments and unknown elements are ignored.
    pub fn parse(content: &str) -> Result<Self, quick_xml::DeError> {
        let raw: RawProject = from_str(content)?;
        let mut properties = ProjectProperties::default();

        // Later PropertyGroups override earlier ones, as in MSBuild
        for group in raw.property_groups {
            if let Some(name) = non_empty(group.assembly_name) {
                properties.assembly_name = Some(name);
            }
            if let Some(tfm) = non_empty(group.target_framework) {
                properties.target_framework = Some(tfm);
                properties.target_frameworks.clear();
            }
            if let Some(list) = non_empty(group.target_frameworks) {
                properties.target_frameworks = list
                    .split(';')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
        }

        if properties.target_framework.is_none() {
            properties.target_framework = properties.target_frameworks.first().cloned();
        }
        Ok(properties)
    }

    pub fn is_multi_targeted(&self) -> bool {
        self.target_frameworks.len() > 1
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
struct RawProject {
    #[serde(rename = "PropertyGroup", default)]
    property_groups: Vec<RawPropertyGroup>,
}

#[derive(Debug, Deserialize)]
struct RawPropertyGroup {
    #[serde(rename = "AssemblyName")]
    assembly_name: Option<String>,
    #[serde(rename = "TargetFramework")]
    target_framework: Option<String>,
    #[serde(rename = "TargetFrameworks")]
    target_frameworks: Option<String>,
}
