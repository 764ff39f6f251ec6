//! Site compiler configuration.

use serde::Serialize;

use crate::Domain;

/// How the build stage invokes the static-site generator. The command is
/// a template with `{domain}` substituted per deploy; image, entrypoint
/// and working directory are fixed process-wide.
#[derive(Debug, Clone, Serialize)]
pub struct CompilerConfig {
    pub image: String,
    pub command_template: String,
    pub working_dir: String,
    pub entrypoint: String,
}

impl CompilerConfig {
    /// Render the build command for a concrete domain.
    pub fn render_command(&self, domain: &Domain) -> String {
        self.command_template.replace("{domain}", domain.as_str())
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            image: "hugomods/hugo:debian-ci-0.147.9".to_string(),
            command_template: r#"hugo --gc --minify --baseURL "https://{domain}/""#.to_string(),
            working_dir: "/repo".to_string(),
            entrypoint: "/bin/sh".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_domain_into_command() {
        let config = CompilerConfig::default();
        let domain = Domain::parse("example.com").unwrap();
        assert_eq!(
            config.render_command(&domain),
            r#"hugo --gc --minify --baseURL "https://example.com/""#
        );
    }
}
