use std::path::Path;
use std::process::Command;

use crate::config::OpenConfig;
use crate::error::OpenError;

/// Open a file, jumping to `line` when an editor can do that.
///
/// With a line: the configured editor template, then VS Code's `--goto`,
/// then the platform default. Without one: the platform default.
pub fn open_file(config: &OpenConfig, path: &Path, line: Option<usize>) -> Result<(), OpenError> {
    if !path.exists() {
        return Err(OpenError::NotFound(path.to_path_buf()));
    }

    if let Some(line) = line {
        if let Some(template) = &config.editor {
            let argv = editor_argv(template, path, line);
            return spawn(&argv);
        }

        let goto = format!("{}:{}", path.display(), line);
        match Command::new("code").args(["--goto", &goto]).spawn() {
            Ok(_) => return Ok(()),
            Err(e) => log::debug!("VS Code not available: {}", e),
        }
    }

    opener::open(path)?;
    Ok(())
}

/// Split the template into words, then fill `{path}` and `{line}`
fn editor_argv(template: &str, path: &Path, line: usize) -> Vec<String> {
    let path = path.to_string_lossy();
    let line = line.to_string();
    template
        .split_whitespace()
        .map(|word| word.replace("{path}", &path).replace("{line}", &line))
        .collect()
}

fn spawn(argv: &[String]) -> Result<(), OpenError> {
    let Some((program, args)) = argv.split_first() else {
        return Err(OpenError::Editor {
            command: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty editor command"),
        });
    };

    Command::new(program)
        .args(args)
        .spawn()
        .map(|_| ())
        .map_err(|source| OpenError::Editor {
            command: program.clone(),
            source,
        })
}
