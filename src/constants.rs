// constants file
pub const CLAUDE_EXECUTABLE: &str = "claude";
pub const PROMPT_FLAG: &str = "--prompt";

pub const APP_NAME: &str = "prompt-runner";
pub const ENV_PREFIX: &str = "PROMPT_RUNNER";

/// Prompts issued when none are given on the command line.
pub const EXAMPLE_PROMPTS: [&str; 3] = [
    "HTML'de bir login formu oluştur",
    "Python'da dosya okuma yazma örneği",
    "JavaScript'te API çağrısı nasıl yapılır",
];

pub const DEFAULT_CONFIG_CONTENT: &str = r#"# prompt-runner configuration
#
# Every key can also be set through the environment, e.g. PROMPT_RUNNER_VERBOSITY=debug

# One of: error, warn, info, debug, trace
verbosity = "warn"

# How results are printed: "text" or "json" (one object per line)
output = "text"
"#;
