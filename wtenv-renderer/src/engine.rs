//! `{placeholder}` rendering engine.
//!
//! A placeholder is `{` + one or more non-`}` characters + `}`. Known keys are
//! substituted; unknown ones are left verbatim so a literal `{foo}` in a
//! template survives rendering.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use regex::{Captures, Regex};

use wtenv_core::config::EnvSpec;

use crate::context::TemplateVars;
use crate::error::RenderError;

const PLACEHOLDER: &str = r"\{([^}]+)\}";

/// Compiled renderer. Build once with [`Renderer::new`] and reuse.
#[derive(Debug, Clone)]
pub struct Renderer {
    placeholder: Regex,
}

impl Renderer {
    pub fn new() -> Result<Self, RenderError> {
        Ok(Self {
            placeholder: Regex::new(PLACEHOLDER)?,
        })
    }

    /// Substitute every known `{key}` in `template`.
    pub fn render_template(&self, template: &str, vars: &TemplateVars) -> String {
        self.placeholder
            .replace_all(template, |caps: &Captures<'_>| match vars.get(&caps[1]) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Render every env template. The result is keyed by variable name.
    pub fn render_env(
        &self,
        specs: &IndexMap<String, EnvSpec>,
        vars: &TemplateVars,
    ) -> BTreeMap<String, String> {
        specs
            .iter()
            .map(|(name, spec)| (name.clone(), self.render_template(&spec.template, vars)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use wtenv_core::types::{PortMap, ProjectName, RoleName};

    fn vars() -> TemplateVars {
        let ports = PortMap::from([(RoleName::from("PORT"), 4000)]);
        TemplateVars::new(&ProjectName::from("myapp"), "feat", &ports)
    }

    #[rstest]
    #[case::simple("{project}_dev", "myapp_dev")]
    #[case::dotted_key("http://localhost:{port.PORT}", "http://localhost:4000")]
    #[case::unknown_key_kept("{unknown}", "{unknown}")]
    #[case::multiple("{project}_{worktree}", "myapp_feat")]
    #[case::no_placeholders("plain", "plain")]
    #[case::empty_braces_untouched("{}", "{}")]
    #[case::unclosed_brace("{project", "{project")]
    fn renders_template(#[case] template: &str, #[case] expected: &str) {
        let renderer = Renderer::new().unwrap();
        assert_eq!(renderer.render_template(template, &vars()), expected);
    }

    #[test]
    fn renders_env_specs() {
        let renderer = Renderer::new().unwrap();
        let mut specs = IndexMap::new();
        specs.insert(
            "DB_NAME".to_string(),
            EnvSpec { template: "{project}_dev_{worktree}".to_string() },
        );
        specs.insert(
            "URL".to_string(),
            EnvSpec { template: "http://localhost:{port.PORT}".to_string() },
        );
        specs.insert("EMPTY".to_string(), EnvSpec::default());

        let env = renderer.render_env(&specs, &vars());
        assert_eq!(env["DB_NAME"], "myapp_dev_feat");
        assert_eq!(env["URL"], "http://localhost:4000");
        assert_eq!(env["EMPTY"], "");
    }
}
