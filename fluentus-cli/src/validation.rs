use std::path::Path;
use unic_langid::LanguageIdentifier;

/// Validation context for the project-level commands
#[derive(Debug, Default)]
pub struct ValidationContext {
    pub project: Option<String>,
    pub output_dir: Option<String>,
    pub language_code: Option<String>,
    pub key: Option<String>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project: String) -> Self {
        self.project = Some(project);
        self
    }

    pub fn with_output_dir(mut self, dir: String) -> Self {
        self.output_dir = Some(dir);
        self
    }

    pub fn with_language_code(mut self, lang: String) -> Self {
        self.language_code = Some(lang);
        self
    }

    pub fn with_key(mut self, key: String) -> Self {
        self.key = Some(key);
        self
    }
}

/// Validate that the project folder exists and is a directory
pub fn validate_project_dir(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("Project folder does not exist: {}", path));
    }

    if !path_obj.is_dir() {
        return Err(format!("Project path is not a directory: {}", path));
    }

    Ok(())
}

/// Validate that the output folder is a directory or can be created
pub fn validate_output_dir(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if path_obj.exists() && !path_obj.is_dir() {
        return Err(format!("Output path is not a directory: {}", path));
    }

    Ok(())
}

/// Validate language code format using unic-langid (same as lib crate)
pub fn validate_language_code(lang: &str) -> Result<(), String> {
    if lang.is_empty() {
        return Err("Language code cannot be empty".to_string());
    }

    lang.parse::<LanguageIdentifier>().map(|_| ()).map_err(|_| {
        format!(
            "Invalid language code format: {}. Expected valid BCP 47 language identifier",
            lang
        )
    })
}

/// Validate a message key (`name`) or term key (`-name`)
pub fn validate_key(key: &str) -> Result<(), String> {
    let id = key.strip_prefix('-').unwrap_or(key);
    if fluentus::ast::is_identifier(id) {
        Ok(())
    } else {
        Err(format!(
            "Invalid key: {}. Expected a Fluent identifier like `welcome` or `-brand`",
            key
        ))
    }
}

/// Split an `--attribute NAME=VALUE` argument.
pub fn parse_attribute_assignment(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("Invalid attribute assignment: {}. Expected NAME=VALUE", raw))?;
    let name = name.trim().trim_start_matches('.');
    if !fluentus::ast::is_identifier(name) {
        return Err(format!("Invalid attribute name: {}", name));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Validate a complete validation context
pub fn validate_context(context: &ValidationContext) -> Result<(), String> {
    if let Some(ref project) = context.project {
        validate_project_dir(project).map_err(|e| format!("Project validation failed: {}", e))?;
    }

    if let Some(ref output) = context.output_dir {
        validate_output_dir(output).map_err(|e| format!("Output validation failed: {}", e))?;
    }

    if let Some(ref lang) = context.language_code {
        validate_language_code(lang)
            .map_err(|e| format!("Language code validation failed: {}", e))?;
    }

    if let Some(ref key) = context.key {
        validate_key(key).map_err(|e| format!("Key validation failed: {}", e))?;
    }

    Ok(())
}
