//! The two-screen prompt loop: key entry, then chatting.
//!
//! Mirrors the session state machine: the outer loop is the key-entry
//! screen, the inner loop is the chat screen, and `/key` transitions back.

use anyhow::Result;
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use url::Url;

use keychat::session::ChatSession;

pub async fn run() -> Result<()> {
    let mut editor = Reedline::create();
    let mut session = ChatSession::new();

    println!("keychat: your key stays in memory and goes only to the provider it belongs to.");

    loop {
        // Key-entry screen.
        let Some(key) = read_line(&mut editor, "API key")? else {
            return Ok(());
        };
        if key.trim().is_empty() {
            println!("An API key is required to start.");
            continue;
        }

        let (provider, manual) = {
            let params = session.submit_key(&key);
            (params.provider.clone(), params.manual_override)
        };

        if manual {
            println!("No known provider matches this key; enter connection details by hand.");
            let Some(model) = read_line(&mut editor, "model")? else {
                return Ok(());
            };
            let Some(base_url) = read_base_url(&mut editor)? else {
                return Ok(());
            };
            session.set_manual_params(&model, &base_url);
        } else {
            println!("Detected provider: {provider}");
        }
        println!("Chatting. /clear resets history, /key changes the key, /quit exits.");

        // Chat screen.
        loop {
            let Some(line) = read_line(&mut editor, "you")? else {
                return Ok(());
            };
            match line.trim() {
                "" => {}
                "/quit" => return Ok(()),
                "/clear" => {
                    session.clear_history();
                    println!("History cleared.");
                }
                "/key" => {
                    session.reset_key();
                    break;
                }
                text => match session.send_message(text).await {
                    Ok(()) => {
                        if let Some(reply) = session.history().last() {
                            println!("assistant> {}", reply.content);
                        }
                    }
                    Err(rejected) => println!("{rejected}"),
                },
            }
        }
    }
}

/// Prompt for the manual-mode endpoint base, re-asking until it parses as a
/// URL.
fn read_base_url(editor: &mut Reedline) -> Result<Option<String>> {
    loop {
        let Some(input) = read_line(editor, "base URL")? else {
            return Ok(None);
        };
        let input = input.trim();
        match Url::parse(input) {
            Ok(_) => return Ok(Some(input.to_string())),
            Err(err) => println!("Invalid URL ({err}), try again."),
        }
    }
}

/// Read one line under the given prompt label. `None` means the user asked
/// to leave (ctrl-c / ctrl-d).
fn read_line(editor: &mut Reedline, label: &str) -> Result<Option<String>> {
    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic(label.to_string()),
        DefaultPromptSegment::Empty,
    );
    match editor.read_line(&prompt)? {
        Signal::Success(line) => Ok(Some(line)),
        Signal::CtrlC | Signal::CtrlD => Ok(None),
    }
}
