//! Render a ServiceDefinition into unit file text
//!
//! Output is a pure function of the definition: preview and install must
//! show byte-identical text.

use std::fmt::{self, Write};

use super::parser::{self, ParseError};
use super::service::ServiceDefinition;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to format unit text")]
    Format(#[from] fmt::Error),

    #[error("rendered unit does not parse: {0}")]
    Parse(#[from] ParseError),

    #[error("{key}= value contains a line break")]
    LineBreak { key: &'static str },

    #[error("rendered unit is missing {key}= in {section}")]
    MissingKey {
        section: &'static str,
        key: &'static str,
    },
}

/// Directives every generated unit must contain
const REQUIRED: &[(&str, &str)] = &[
    ("[Unit]", "Description"),
    ("[Unit]", "After"),
    ("[Service]", "ExecStart"),
    ("[Service]", "WorkingDirectory"),
    ("[Service]", "Restart"),
    ("[Service]", "RestartSec"),
    ("[Service]", "Type"),
    ("[Install]", "WantedBy"),
];

/// Render and verify the unit text for `def`
pub fn render(def: &ServiceDefinition) -> Result<String, RenderError> {
    let text = render_text(def)?;
    verify(&text)?;
    Ok(text)
}

fn render_text(def: &ServiceDefinition) -> Result<String, RenderError> {
    let svc = &def.service;
    let mut out = String::new();

    writeln!(out, "[Unit]")?;
    directive(&mut out, "Description", &def.unit.description)?;
    directive(&mut out, "After", def.unit.after.join(" "))?;
    writeln!(out)?;

    writeln!(out, "[Service]")?;
    directive(&mut out, "ExecStart", &svc.exec_start)?;
    directive(&mut out, "WorkingDirectory", svc.working_directory.display())?;
    directive(&mut out, "Restart", svc.restart.as_str())?;
    directive(&mut out, "RestartSec", svc.restart_sec.as_secs())?;
    directive(&mut out, "Type", svc.service_type)?;
    if let Some(user) = svc.user.as_deref().filter(|u| !u.is_empty()) {
        directive(&mut out, "User", user)?;
    }
    if let Some(group) = svc.group.as_deref().filter(|g| !g.is_empty()) {
        directive(&mut out, "Group", group)?;
    }
    for assignment in &svc.environment {
        directive(&mut out, "Environment", assignment)?;
    }
    for file in &svc.environment_files {
        directive(&mut out, "EnvironmentFile", file.display())?;
    }
    writeln!(out)?;

    writeln!(out, "[Install]")?;
    directive(&mut out, "WantedBy", def.install.wanted_by.join(" "))?;

    Ok(out)
}

/// Write one `key=value` line; the value must stay on that line
fn directive(
    out: &mut String,
    key: &'static str,
    value: impl fmt::Display,
) -> Result<(), RenderError> {
    let value = value.to_string();
    if value.contains(['\n', '\r']) {
        return Err(RenderError::LineBreak { key });
    }
    writeln!(out, "{}={}", key, value)?;
    Ok(())
}

/// Parse the text back and check the fixed directives are all there
fn verify(text: &str) -> Result<(), RenderError> {
    let parsed = parser::parse_file(text)?;
    for &(section, key) in REQUIRED {
        if parser::values(&parsed, section, key).is_empty() {
            return Err(RenderError::MissingKey { section, key });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::service::*;
    use std::path::PathBuf;

    fn definition() -> ServiceDefinition {
        ServiceDefinition {
            name: "sleep".into(),
            unit: UnitSection {
                description: "sleep".into(),
                after: vec!["network.target".into()],
            },
            service: ServiceSection {
                service_type: ServiceType::Simple,
                exec_start: ExecCommand {
                    program: PathBuf::from("/bin/sleep"),
                    args: vec!["100".into()],
                },
                working_directory: PathBuf::from("/root"),
                restart: RestartPolicy::Always,
                restart_sec: RESTART_SEC,
                user: None,
                group: None,
                environment: Vec::new(),
                environment_files: Vec::new(),
            },
            install: InstallSection {
                wanted_by: vec!["multi-user.target".into()],
            },
        }
    }

    #[test]
    fn test_render_minimal() {
        let text = render(&definition()).unwrap();
        assert_eq!(
            text,
            "[Unit]\n\
             Description=sleep\n\
             After=network.target\n\
             \n\
             [Service]\n\
             ExecStart=/bin/sleep 100\n\
             WorkingDirectory=/root\n\
             Restart=always\n\
             RestartSec=5\n\
             Type=simple\n\
             \n\
             [Install]\n\
             WantedBy=multi-user.target\n"
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut def = definition();
        def.service.environment = vec!["A=1".into(), "B=2".into()];
        def.service.user = Some("app".into());
        assert_eq!(render(&def).unwrap(), render(&def).unwrap());
    }

    #[test]
    fn test_environment_lines_in_order() {
        let mut def = definition();
        def.service.environment = vec!["A=1".into(), "B=2".into()];
        let text = render(&def).unwrap();

        let a = text.find("Environment=A=1\n").unwrap();
        let b = text.find("Environment=B=2\n").unwrap();
        assert!(a < b);
        assert!(!text.contains("User="));
        assert!(!text.contains("Group="));
    }

    #[test]
    fn test_identity_lines() {
        let mut def = definition();
        def.service.user = Some("app".into());
        def.service.group = Some("staff".into());
        let text = render(&def).unwrap();
        assert!(text.contains("\nUser=app\n"));
        assert!(text.contains("\nGroup=staff\n"));
    }

    #[test]
    fn test_empty_identity_is_skipped() {
        let mut def = definition();
        def.service.user = Some(String::new());
        let text = render(&def).unwrap();
        assert!(!text.contains("User="));
    }

    #[test]
    fn test_environment_files_in_order() {
        let mut def = definition();
        def.service.environment_files =
            vec![PathBuf::from("/etc/a.env"), PathBuf::from("-/etc/b.env")];
        let text = render(&def).unwrap();

        let parsed = parser::parse_file(&text).unwrap();
        assert_eq!(
            parser::values(&parsed, "[Service]", "EnvironmentFile"),
            vec!["/etc/a.env", "-/etc/b.env"]
        );
    }

    #[test]
    fn test_rendered_type() {
        let mut def = definition();
        def.service.service_type = ServiceType::Forking;
        let text = render(&def).unwrap();
        assert!(text.contains("\nType=forking\n"));
    }

    #[test]
    fn test_line_break_cannot_inject_directive() {
        let mut def = definition();
        def.service.environment = vec!["A=1\nUser=root".into()];
        let err = render(&def).unwrap_err();
        assert!(matches!(err, RenderError::LineBreak { key: "Environment" }));
    }

    #[test]
    fn test_line_breaks_rejected_everywhere() {
        let mut def = definition();
        def.unit.description = "one\ntwo".into();
        assert!(matches!(
            render(&def),
            Err(RenderError::LineBreak { key: "Description" })
        ));

        let mut def = definition();
        def.service.group = Some("staff\r".into());
        assert!(matches!(
            render(&def),
            Err(RenderError::LineBreak { key: "Group" })
        ));

        let mut def = definition();
        def.service.environment_files = vec![PathBuf::from("/etc/a.env\nUser=root")];
        assert!(matches!(
            render(&def),
            Err(RenderError::LineBreak { key: "EnvironmentFile" })
        ));

        let mut def = definition();
        def.service.exec_start.args = vec!["x\nUser=root".into()];
        assert!(matches!(
            render(&def),
            Err(RenderError::LineBreak { key: "ExecStart" })
        ));
    }

    #[test]
    fn test_verify_rejects_missing_directive() {
        let err = verify("[Unit]\nDescription=x\n").unwrap_err();
        assert!(matches!(
            err,
            RenderError::MissingKey {
                section: "[Unit]",
                key: "After"
            }
        ));
    }
}
