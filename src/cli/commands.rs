//! Command dispatch

use std::io::{self, Read};
use std::path::Path;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::services::{CheatsheetService, Scope};
use crate::application::{ApplicationError, IoResultExt};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{self, Settings};
use crate::domain::{parser, query, Selection, Tree};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Build services from settings and run the selected command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    // Commands that don't need a store
    match command {
        Commands::Example => {
            output::info(&parser::example_format());
            return Ok(());
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            return Ok(());
        }
        _ => {}
    }

    let settings = load_settings(cli)?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Add {
            file,
            dry_run,
            edit,
        } => {
            let text = if *edit {
                compose_in_editor(&container)?
            } else {
                read_input(&container, file.as_deref())?
            };
            cmd_add(&container.cheatsheets, &text, *dry_run)
        }
        Commands::Collect {
            course,
            module,
            unit,
            single,
            formatted,
        } => cmd_collect(
            &container.cheatsheets,
            &Selection::new(course, module, unit),
            *single,
            *formatted,
        ),
        Commands::Units {
            course,
            module,
            unit,
        } => cmd_units(
            &container.cheatsheets,
            &Selection::new(course, module, unit),
        ),
        Commands::List { course, module } => {
            cmd_list(&container.cheatsheets, course.as_deref(), module.as_deref())
        }
        Commands::Import { file } => cmd_import(&container, file),
        Commands::Export { file } => cmd_export(&container, file.as_deref()),
        Commands::Clear { yes } => cmd_clear(&container.cheatsheets, *yes),
        Commands::Config { command } => cmd_config(&container, cli, command),
        Commands::Example | Commands::Completion { .. } => Ok(()),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e))?,
    };
    let mut settings = Settings::load(Some(&project_dir))?;
    if let Some(data_file) = &cli.data_file {
        settings.data_file = data_file.clone();
    }
    debug!("settings: data_file={}", settings.data_file.display());
    Ok(settings)
}

fn read_input(container: &ServiceContainer, file: Option<&Path>) -> CliResult<String> {
    match file {
        Some(path) => Ok(container
            .fs
            .read_to_string(path)
            .with_path_context("read notes", path)?),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| InfraError::io("read notes from stdin", e))?;
            Ok(text)
        }
    }
}

/// Open the configured editor on an empty temp file and return what was written.
fn compose_in_editor(container: &ServiceContainer) -> CliResult<String> {
    let tmp = tempfile::Builder::new()
        .prefix("cheatsheets-")
        .suffix(".md")
        .tempfile()
        .map_err(|e| InfraError::io("create temp file for editor", e))?;
    container
        .editor
        .open(tmp.path())
        .map_err(|e| InfraError::Editor {
            message: e.to_string(),
        })?;
    Ok(container
        .fs
        .read_to_string(tmp.path())
        .with_path_context("read edited notes", tmp.path())?)
}

#[instrument(skip(service, text))]
fn cmd_add(service: &CheatsheetService, text: &str, dry_run: bool) -> CliResult<()> {
    if dry_run {
        let doc = service.preview(text)?;
        output::header(&format!("Parsed ({} format)", doc.grammar));
        output::info(&output::course_tree(&doc.tree, "notes"));
        return Ok(());
    }

    let summary = service.add_text(text)?;
    output::success(&format!(
        "Parsed {} course(s), {} module(s), {} unit(s) ({} format)",
        summary.courses, summary.modules, summary.units, summary.grammar
    ));
    output::detail(&format!(
        "{} unit(s) added, {} updated",
        summary.added, summary.overwritten
    ));
    Ok(())
}

#[instrument(skip(service))]
fn cmd_collect(
    service: &CheatsheetService,
    sel: &Selection,
    single: bool,
    formatted: bool,
) -> CliResult<()> {
    let collected = if formatted {
        service.formatted(sel)?
    } else {
        let scope = if single { Scope::Single } else { Scope::Cumulative };
        service.collect(sel, scope)?
    };

    if collected.is_empty() {
        return Err(not_found(sel));
    }
    output::info(&collected.content);
    output::note(&format!("{} unit(s) included", collected.unit_count));
    Ok(())
}

#[instrument(skip(service))]
fn cmd_units(service: &CheatsheetService, sel: &Selection) -> CliResult<()> {
    let records = service.units(sel)?;
    if records.is_empty() {
        return Err(not_found(sel));
    }
    output::header(&format!("{}: {} unit(s)", sel.course, records.len()));
    for (i, record) in records.iter().enumerate() {
        output::detail(&format!(
            "{:>3}. {} / {} ({} chars)",
            i + 1,
            record.module,
            record.unit,
            record.content.chars().count()
        ));
    }
    Ok(())
}

#[instrument(skip(service))]
fn cmd_list(
    service: &CheatsheetService,
    course: Option<&str>,
    module: Option<&str>,
) -> CliResult<()> {
    let tree = service.tree()?;
    match (course, module) {
        (None, _) => {
            if tree.is_empty() {
                output::warning("no courses stored yet");
            } else {
                output::info(&output::course_tree(&tree, "courses"));
            }
        }
        (Some(course), None) => {
            if tree.course(course).is_none() {
                return Err(CliError::NotFound(format!("course \"{}\"", course)));
            }
            output::header(course);
            for name in query::module_names(&tree, course) {
                output::detail(name);
            }
        }
        (Some(course), Some(module)) => {
            if tree.course(course).and_then(|c| c.module(module)).is_none() {
                return Err(CliError::NotFound(format!(
                    "module \"{}\" in course \"{}\"",
                    module, course
                )));
            }
            output::header(&format!("{} / {}", course, module));
            for name in query::unit_names(&tree, course, module) {
                output::detail(name);
            }
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_import(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let content = container
        .fs
        .read_to_string(file)
        .with_path_context("read import file", file)?;
    let incoming: Tree = serde_json::from_str(&content)
        .map_err(|e| CliError::InvalidArgs(format!("{}: {}", file.display(), e)))?;
    let stats = container.cheatsheets.import(incoming)?;
    output::success(&format!(
        "Imported {}: {} unit(s) added, {} updated",
        file.display(),
        stats.added,
        stats.overwritten
    ));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_export(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let tree = container.cheatsheets.export()?;
    let json = serde_json::to_string_pretty(&tree).map_err(|e| ApplicationError::Store {
        message: format!("serialize tree: {}", e),
    })?;
    match file {
        Some(path) => {
            container
                .fs
                .write(path, &json)
                .with_path_context("write export", path)?;
            output::action("Exported", &path.display());
        }
        None => output::info(&json),
    }
    Ok(())
}

#[instrument(skip(service))]
fn cmd_clear(service: &CheatsheetService, yes: bool) -> CliResult<()> {
    if !yes {
        output::prompt("Remove all stored courses? [y/N]");
        let mut answer = String::new();
        io::stdin()
            .read_line(&mut answer)
            .map_err(|e| InfraError::io("read confirmation", e))?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            output::info(&"Aborted");
            return Ok(());
        }
    }
    service.clear()?;
    output::success(&"Store cleared");
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    cli: &Cli,
    command: &ConfigCommands,
) -> CliResult<()> {
    let settings = &container.settings;
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match config::global_config_path() {
                Some(p) => output::action("global", &p.display()),
                None => output::warning("no config directory for this platform"),
            }
            if let Some(dir) = &cli.project_dir {
                output::action("local", &config::local_config_path(dir).display());
            } else if let Ok(cwd) = std::env::current_dir() {
                output::action("local", &config::local_config_path(&cwd).display());
            }
            output::action("data", &settings.data_file.display());
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                config::global_config_path().ok_or_else(|| {
                    CliError::Usage("no config directory for this platform".into())
                })?
            } else {
                let dir = match &cli.project_dir {
                    Some(dir) => dir.clone(),
                    None => std::env::current_dir()
                        .map_err(|e| InfraError::io("determine current directory", e))?,
                };
                config::local_config_path(&dir)
            };
            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .with_path_context("create config directory for", &path)?;
            container
                .fs
                .write(&path, &Settings::template())
                .with_path_context("write config", &path)?;
            output::action("Created", &path.display());
        }
    }
    Ok(())
}

fn not_found(sel: &Selection) -> CliError {
    CliError::NotFound(format!(
        "unit \"{}\" under module \"{}\" in course \"{}\"",
        sel.unit, sel.module, sel.course
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use clap::Parser;
    use tempfile::TempDir;

    use crate::config::StoreConfig;
    use crate::infrastructure::traits::{CommandEditor, FileSystem, RealFileSystem, TreeStore};
    use crate::infrastructure::JsonFileStore;

    /// Real filesystem that records every path written through it.
    #[derive(Default)]
    struct RecordingFileSystem {
        written: Mutex<Vec<PathBuf>>,
    }

    impl FileSystem for RecordingFileSystem {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            RealFileSystem.read_to_string(path)
        }
        fn write(&self, path: &Path, content: &str) -> io::Result<()> {
            self.written.lock().unwrap().push(path.to_path_buf());
            RealFileSystem.write(path, content)
        }
        fn exists(&self, path: &Path) -> bool {
            RealFileSystem.exists(path)
        }
        fn create_dir_all(&self, path: &Path) -> io::Result<()> {
            RealFileSystem.create_dir_all(path)
        }
        fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
            RealFileSystem.rename(from, to)
        }
        fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
            RealFileSystem.copy(from, to)
        }
        fn remove_file(&self, path: &Path) -> io::Result<()> {
            RealFileSystem.remove_file(path)
        }
    }

    fn container(temp: &TempDir, fs: Arc<RecordingFileSystem>) -> ServiceContainer {
        let settings = Settings {
            data_file: temp.path().join("cheatsheets.json"),
            editor: "vim".into(),
            store: StoreConfig::default(),
        };
        let store: Arc<dyn TreeStore> = Arc::new(JsonFileStore::new(
            fs.clone(),
            settings.data_file.clone(),
            settings.store.clone(),
        ));
        ServiceContainer::with_deps(settings, fs, store, Arc::new(CommandEditor::new("vim")))
    }

    #[test]
    fn given_project_dir_when_config_init_then_template_written_through_container_fs() {
        // Arrange
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("nested/project");
        let fs = Arc::new(RecordingFileSystem::default());
        let container = container(&temp, fs.clone());
        let cli = Cli::try_parse_from([
            "cheatsheets",
            "-C",
            project.to_str().unwrap(),
            "config",
            "init",
        ])
        .unwrap();
        let Some(Commands::Config { command }) = &cli.command else {
            panic!("expected config command");
        };

        // Act
        cmd_config(&container, &cli, command).unwrap();

        // Assert
        let target = config::local_config_path(&project);
        assert_eq!(*fs.written.lock().unwrap(), vec![target.clone()]);
        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            Settings::template()
        );
        assert!(matches!(
            cmd_config(&container, &cli, command),
            Err(CliError::Usage(_))
        ));
    }
}
