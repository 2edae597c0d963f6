//! Template cleanup commands — `stencil cleanup` and `stencil status`.

use anyhow::Result;
use std::path::Path;

use stencil::cleanup::{RepoState, detect_state, finalize, run_cleanup, steps};
use stencil::report::{CleanupReport, StepOutcome};

pub fn cmd_cleanup(project_dir: &Path, run_finalize: bool, json: bool) -> Result<()> {
    let mut report = run_cleanup(project_dir)?;

    if json {
        if report.state == RepoState::Ready && run_finalize && report.fully_applied() {
            let outcome = finalize(project_dir);
            report.record(steps::FINALIZE, outcome);
        }
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match report.state {
        RepoState::Template => {
            println!(
                "This checkout still carries the template name; nothing to clean up."
            );
            println!("Cleanup runs in projects derived from the starter, not in the starter itself.");
            return Ok(());
        }
        RepoState::Dirty => {
            println!(
                "{} uncommitted changes on the manifest or template files.",
                console::style("Skipped:").yellow().bold()
            );
            println!("Commit or discard your changes, then re-run `stencil cleanup`.");
            return Ok(());
        }
        RepoState::Ready => {}
    }

    print_report(&report);

    if run_finalize {
        if report.fully_applied() {
            let outcome = finalize(project_dir);
            print_step(steps::FINALIZE, &outcome);
        } else {
            println!(
                "  {} {} (cleanup did not fully apply)",
                console::style("skipped").dim(),
                steps::FINALIZE
            );
        }
    } else if report.fully_applied() {
        println!();
        println!("Run `stencil cleanup --finalize` to remove the template document.");
    }

    Ok(())
}

pub fn cmd_status(project_dir: &Path) -> Result<()> {
    let state = detect_state(project_dir)?;
    let label = match state {
        RepoState::Template => console::style("template").cyan(),
        RepoState::Dirty => console::style("dirty").yellow(),
        RepoState::Ready => console::style("ready").green(),
    };
    println!("Repository state: {label}");
    match state {
        RepoState::Template => println!("Unmodified starter; cleanup is suppressed."),
        RepoState::Dirty => println!("Uncommitted changes on guarded files; cleanup is suppressed."),
        RepoState::Ready => println!("Derived project with a clean tree; cleanup may run."),
    }
    Ok(())
}

fn print_report(report: &CleanupReport) {
    println!("{}", console::style("Template cleanup").bold());
    for step in &report.steps {
        print_step(step.step, &step.outcome);
    }
    println!();
    if report.fully_applied() {
        println!("{}", console::style("Cleanup complete.").green());
    } else {
        println!(
            "{} some steps failed; the project is usable but needs manual attention.",
            console::style("Partial cleanup:").yellow().bold()
        );
    }
}

fn print_step(name: &str, outcome: &StepOutcome) {
    match outcome {
        StepOutcome::Applied => {
            println!("  {} {name}", console::style("applied").green())
        }
        StepOutcome::Skipped(reason) => {
            println!("  {} {name} ({reason})", console::style("skipped").dim())
        }
        StepOutcome::Failed(reason) => {
            println!("  {} {name}: {reason}", console::style("failed ").red())
        }
    }
}
