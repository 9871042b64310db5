use std::path::Path;

fn main() {
    let demo_path = Path::new("scripts/demo.bio");
    validate_demo_script(demo_path);
    set_build_dependencies();
}

fn validate_demo_script(demo_path: &Path) {
    // The demo script is embedded in the binary for self-verification
    assert!(
        demo_path.exists(),
        "\n\nDEMO SCRIPT BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the demo script before building.\n",
        demo_path.display()
    );

    let contents = std::fs::read_to_string(demo_path).unwrap_or_else(|e| {
        panic!(
            "\n\nDEMO SCRIPT BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            demo_path.display()
        );
    });

    let commands = validate_lines(&contents);
    assert!(
        commands > 0,
        "\n\nDEMO SCRIPT BUILD ERROR: No commands\n\
         Path: {}\n\
         The demo script must contain at least one command line.\n",
        demo_path.display()
    );

    println!("cargo:warning=Validated demo script: {commands} commands");
}

fn validate_lines(contents: &str) -> usize {
    let mut commands = 0;

    for (i, line) in contents.lines().enumerate() {
        let line_number = i + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.to_lowercase().starts_with("note ") {
            continue;
        }

        assert!(
            !line.contains('\t'),
            "\n\nDEMO SCRIPT BUILD ERROR: Tab character\n\
             Line {line_number}: {line:?}\n\
             Hint: Separate words with spaces.\n"
        );

        let verb = trimmed
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase();

        // Verification runs the demo; a verify or file access inside it would recurse or depend on the host
        assert!(
            !matches!(verb.as_str(), "verify" | "save" | "write" | "export" | "plot"),
            "\n\nDEMO SCRIPT BUILD ERROR: Command not allowed in the demo\n\
             Line {line_number}: {trimmed}\n\
             Hint: The demo must run in memory without touching the filesystem.\n"
        );
        assert!(
            !(verb == "load" && trimmed.to_lowercase().contains(" file ")),
            "\n\nDEMO SCRIPT BUILD ERROR: File load in the demo\n\
             Line {line_number}: {trimmed}\n\
             Hint: Load sequences with 'load dna text ... as ...'.\n"
        );
        assert!(
            !matches!(verb.as_str(), "exit" | "quit" | "close" | "leave"),
            "\n\nDEMO SCRIPT BUILD ERROR: Exit verb in the demo\n\
             Line {line_number}: {trimmed}\n\
             Hint: The demo runs to its last line.\n"
        );

        commands += 1;
    }

    commands
}

fn set_build_dependencies() {
    // Rebuild when the embedded demo changes
    println!("cargo:rerun-if-changed=scripts/demo.bio");
    println!("cargo:rerun-if-changed=build.rs");
}
