use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    devsite completions bash > ~/.bash_completion.d/devsite\n\n\
                  Generate zsh completions:\n    devsite completions zsh > ~/.zfunc/_devsite\n\n\
                  Generate fish completions:\n    devsite completions fish > ~/.config/fish/completions/devsite.fish\n\n\
                  Generate PowerShell completions:\n    devsite completions powershell")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
