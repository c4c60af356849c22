//! Template variables: the values a `{placeholder}` may refer to.

use std::collections::BTreeMap;

use wtenv_core::types::{PortMap, ProjectName};

/// Variables visible to env templates:
///
/// | Placeholder     | Value                          |
/// |-----------------|--------------------------------|
/// | `{project}`     | project name                   |
/// | `{worktree}`    | sanitized worktree label       |
/// | `{port.<ROLE>}` | port granted to `<ROLE>`       |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars {
    values: BTreeMap<String, String>,
}

impl TemplateVars {
    pub fn new(project: &ProjectName, worktree: &str, ports: &PortMap) -> Self {
        let mut values = BTreeMap::new();
        values.insert("project".to_string(), project.0.clone());
        values.insert("worktree".to_string(), worktree.to_string());
        for (role, port) in ports {
            values.insert(format!("port.{role}"), port.to_string());
        }
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wtenv_core::types::RoleName;

    #[test]
    fn includes_project_and_worktree() {
        let vars = TemplateVars::new(&ProjectName::from("myapp"), "main", &PortMap::new());
        assert_eq!(vars.len(), 2);
        assert_eq!(vars.get("project"), Some("myapp"));
        assert_eq!(vars.get("worktree"), Some("main"));
    }

    #[test]
    fn includes_ports_under_port_prefix() {
        let ports = PortMap::from([(RoleName::from("PORT"), 4000)]);
        let vars = TemplateVars::new(&ProjectName::from("myapp"), "main", &ports);
        assert_eq!(vars.get("port.PORT"), Some("4000"));
        assert_eq!(vars.get("PORT"), None);
    }
}
