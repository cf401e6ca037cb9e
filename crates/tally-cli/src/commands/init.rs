//! Initialize command - writes a tally.toml with the demo quotas.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tally_config::{Paths, TallyConfig};

use crate::style::{
    colors::SemanticStyle, print_command, print_hint, print_labeled, print_spacer,
    print_success,
};

const GITIGNORE: &str = r"# Tally local state
.tally/

# Local config overrides (not tracked in git)
tally.local.toml
";

pub fn run(path: &str, force: bool) -> Result<()> {
    let project_dir = Path::new(path);

    if Paths::is_initialized(project_dir) && !force {
        anyhow::bail!(
            "Project already initialized in {}. tally.toml already exists (use --force to overwrite).",
            project_dir.display()
        );
    }

    print_spacer();
    println!("Initializing new Tally project...");
    print_spacer();

    fs::create_dir_all(Paths::state_dir(project_dir))
        .context("Failed to create project directory")?;
    print_success("Created project structure");

    let config = TallyConfig::demo();
    config
        .write_project_file(project_dir, force)
        .context("Failed to write tally.toml")?;
    print_success("Wrote tally.toml");

    let gitignore_path = project_dir.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(&gitignore_path, GITIGNORE).context("Failed to write .gitignore")?;
        print_success("Created .gitignore");
    }

    print_spacer();
    print_success("Project initialized successfully!");
    print_spacer();

    let canonical_path = project_dir
        .canonicalize()
        .unwrap_or_else(|_| project_dir.to_path_buf());
    print_labeled("Location", &canonical_path.display().to_string());
    print_labeled("Config", "tally.toml");
    print_labeled("Records", &config.storage.path.display().to_string());

    print_spacer();
    println!("{}", "Next steps:".header());
    print_spacer();

    print_hint("Generate until every quota is met:");
    if path == "." {
        print_command("tally run");
    } else {
        print_command(&format!("tally run --project {path}"));
    }

    Ok(())
}
