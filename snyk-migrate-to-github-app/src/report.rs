//! Outcome reporting.
//!
//! All user-facing output flows through the [`OutcomeSink`] trait so tests
//! can capture structured outcomes instead of parsing console text. The
//! [`ConsoleReporter`] produces the tool's familiar per-target lines.

use crate::migrate::MigrationOutcome;
use crate::targets::Target;

/// Receives per-target events as the run progresses.
pub trait OutcomeSink {
    /// A target was enumerated during a dry run.
    fn target_listed(&mut self, target: &Target);

    /// The dry-run listing finished with the given total.
    fn listing_total(&mut self, count: usize);

    /// One target's migration attempt was classified.
    fn migration_outcome(&mut self, target: &Target, outcome: &MigrationOutcome);
}

/// Prints outcomes to stdout, one line per target.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl OutcomeSink for ConsoleReporter {
    fn target_listed(&mut self, target: &Target) {
        println!(
            "Target: {}, Name: {}",
            target.id, target.attributes.display_name
        );
    }

    fn listing_total(&mut self, count: usize) {
        println!();
        println!("Total Targets: {count}");
    }

    fn migration_outcome(&mut self, target: &Target, outcome: &MigrationOutcome) {
        let id = &target.id;
        let name = &target.attributes.display_name;
        match outcome {
            MigrationOutcome::Migrated => {
                println!("Migrated target: {id} {name} to github-cloud-app");
            }
            MigrationOutcome::AlreadyMigrated => {
                println!(
                    "Unable to migrate target: {id} {name} to github-cloud-app \
                     because it has already been migrated"
                );
            }
            MigrationOutcome::Failed { status } => {
                println!("Unable to migrate target: {id} {name} to github-cloud-app, reason: {status}");
            }
            MigrationOutcome::Unreachable { error } => {
                println!("Unable to migrate target: {id} {name} to github-cloud-app, reason: {error}");
            }
        }
    }
}

/// Reports the accumulated targets without mutating anything.
///
/// Emits one listing line per target, in iteration order, followed by the
/// total.
pub fn report_dry_run(targets: &[Target], sink: &mut dyn OutcomeSink) {
    for target in targets {
        sink.target_listed(target);
    }
    sink.listing_total(targets.len());
}
