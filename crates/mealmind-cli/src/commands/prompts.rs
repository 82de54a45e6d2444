//! Prompts-related command implementations

use anyhow::Result;
use mealmind_core::prompts::{default_prompts_dir, PromptLibrary};
use mealmind_core::AiOperation;

use super::{print_json, Output};

/// List all available prompts and their override status
pub fn cmd_prompts_list(output: Output) -> Result<()> {
    list_prompts(&mut PromptLibrary::new(), output)
}

pub(crate) fn list_prompts(library: &mut PromptLibrary, output: Output) -> Result<()> {
    let prompts = library.list();

    if output.is_json() {
        return print_json(&prompts);
    }

    println!("Available Prompts:\n");

    // Header
    println!("{:<25} {:>7}  {}", "ID", "VERSION", "OVERRIDE");
    println!("{}", "-".repeat(50));

    for info in prompts {
        let override_status = if info.has_override {
            "✓ Custom"
        } else {
            "Default"
        };

        println!("{:<25} {:>7}  {}", info.id, info.version, override_status);
    }

    println!();
    println!(
        "Override directory: {}",
        library
            .override_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not available)".to_string())
    );

    println!();
    println!("To customize a prompt:");
    println!("  1. Copy the default to the override directory");
    println!("  2. Edit the file with your changes");
    println!("  3. Restart the server to use the new prompt");

    Ok(())
}

/// Show the content of a specific prompt
pub fn cmd_prompts_show(prompt_id: &str) -> Result<()> {
    show_prompt(&mut PromptLibrary::new(), prompt_id)
}

pub(crate) fn show_prompt(library: &mut PromptLibrary, prompt_id: &str) -> Result<()> {
    let Some(operation) = AiOperation::parse(prompt_id) else {
        let known: Vec<_> = AiOperation::all().iter().map(|op| op.as_str()).collect();
        anyhow::bail!(
            "Unknown prompt ID: {} (available: {})",
            prompt_id,
            known.join(", ")
        );
    };

    let prompt = library.get(operation)?;

    println!("Prompt: {}", prompt.metadata.id);
    println!("Version: {}", prompt.metadata.version);
    println!("Operation: {}", prompt.metadata.operation);
    println!(
        "Source: {}",
        if prompt.is_override {
            "Override"
        } else {
            "Default"
        }
    );

    if let Some(ref path) = prompt.override_path {
        println!("Override Path: {}", path.display());
    }

    println!();
    println!("--- Content ---");
    println!("{}", prompt.content);

    Ok(())
}

/// Show the path where prompt overrides should be placed
pub fn cmd_prompts_path() -> Result<()> {
    match default_prompts_dir() {
        Some(path) => {
            println!("{}", path.display());

            if !path.exists() {
                eprintln!();
                eprintln!("Note: This directory does not exist yet.");
                eprintln!("Create it to start adding custom prompts.");
            }
        }
        None => {
            eprintln!("Could not determine prompts directory.");
            eprintln!("The data directory is not available on this system.");
        }
    }

    Ok(())
}
