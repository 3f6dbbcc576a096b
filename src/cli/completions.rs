use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    rscharm completions bash > ~/.bash_completion.d/rscharm\n\n\
                  Generate zsh completions:\n    rscharm completions zsh > ~/.zfunc/_rscharm\n\n\
                  Generate fish completions:\n    rscharm completions fish > ~/.config/fish/completions/rscharm.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
