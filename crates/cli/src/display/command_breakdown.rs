use cppcheck_runner_core::AnalyzerCommand;
use std::path::Path;

pub fn print_command_breakdown(command: &AnalyzerCommand, workspace: &Path) {
    println!("{}", command.to_shell_command());
    println!("   🔧 Command breakdown:");
    println!("      • program: {}", command.program);

    if let Some((target, flags)) = command.args.split_last() {
        if !flags.is_empty() {
            println!("      • flags: {:?}", flags);
        }
        println!("      • target: {}", target);
    }

    println!("      • workspace: {}", workspace.display());
    if let Some(dir) = &command.working_dir {
        println!("      • working dir: {}", dir.display());
    }
    println!(
        "      • result file: {}",
        command.diagnostic_path(workspace).display()
    );

    if !command.env.is_empty() {
        println!("      • env:");
        for (key, value) in &command.env {
            println!("          {}={}", key, value);
        }
    }
}
