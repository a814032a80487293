use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Result, anyhow};
use prompt_library_remote::HttpPromptStore;
use prompt_library_service::{AuthFailure, LocalPromptLibrary, PromptError, PromptLibrary, Removal};
use prompt_library_storage::LocalPromptStore;

use crate::config::Config;

/// Where prompt commands go: the signed-in user's store or the offline list.
enum Backend {
    Remote(PromptLibrary),
    Local(LocalPromptLibrary),
}

impl Backend {
    fn open(config: &Config, force_local: bool) -> Result<Self> {
        let credential = if force_local { None } else { config.credential()? };
        match credential {
            Some(credential) => {
                tracing::debug!(api_url = %config.api_url, "using remote prompt store");
                let store = HttpPromptStore::new(&config.api_url, config.timeout)?;
                Ok(Self::Remote(PromptLibrary::new(Arc::new(store), Some(credential))))
            },
            None => {
                if !force_local {
                    eprintln!("Not signed in; using offline prompts.");
                }
                let store = LocalPromptStore::new(&config.data_dir);
                tracing::debug!(path = %store.path().display(), "using offline prompts");
                Ok(Self::Local(LocalPromptLibrary::open(store).map_err(explain)?))
            },
        }
    }
}

pub(crate) async fn list(config: &Config, force_local: bool) -> Result<()> {
    let prompts = match Backend::open(config, force_local)? {
        Backend::Remote(library) => {
            library.load().await.map_err(explain)?;
            library.snapshot().await
        },
        Backend::Local(library) => library.snapshot(),
    };
    print_json(&prompts)
}

pub(crate) async fn add(
    config: &Config,
    force_local: bool,
    title: &str,
    content: &str,
    tag: &str,
) -> Result<()> {
    let created = match Backend::open(config, force_local)? {
        Backend::Remote(library) => library.create(title, content, tag).await,
        Backend::Local(mut library) => library.create(title, content, tag),
    }
    .map_err(explain)?;
    print_json(&created)
}

pub(crate) async fn edit(
    config: &Config,
    force_local: bool,
    id: &str,
    title: &str,
    content: &str,
    tag: &str,
) -> Result<()> {
    let updated = match Backend::open(config, force_local)? {
        Backend::Remote(library) => library.update(id, title, content, tag).await,
        Backend::Local(mut library) => library.update(id, title, content, tag),
    }
    .map_err(explain)?;
    print_json(&updated)
}

pub(crate) async fn delete(config: &Config, force_local: bool, id: &str, yes: bool) -> Result<()> {
    let backend = Backend::open(config, force_local)?;
    if !yes && !confirm(&format!("Delete prompt {id}?"))? {
        println!("Cancelled.");
        return Ok(());
    }
    let removal = match backend {
        Backend::Remote(library) => library.remove(id).await,
        Backend::Local(mut library) => library.remove(id),
    }
    .map_err(explain)?;
    match removal {
        Removal::Deleted => println!("Deleted {id}."),
        Removal::AlreadyGone => println!("{id} was already gone."),
    }
    Ok(())
}

/// Asks a yes/no question on stdin. Anything but an explicit yes is a no.
fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Turns a manager failure into the message shown to the user.
fn explain(err: PromptError) -> anyhow::Error {
    let message = match &err {
        PromptError::Validation(e) => Some(format!("{e}; nothing was saved")),
        PromptError::Authentication(AuthFailure::MissingCredential) => {
            Some("not signed in; run `prompt-library login --token <TOKEN>`".to_owned())
        },
        PromptError::Authentication(AuthFailure::Rejected) => {
            Some("the prompt store rejected your credential; sign in again".to_owned())
        },
        PromptError::NotFound { id } => {
            Some(format!("prompt {id} no longer exists; it was removed from your list"))
        },
        PromptError::Authentication(AuthFailure::SessionChanged)
        | PromptError::Transport(_)
        | PromptError::Busy { .. }
        | PromptError::Storage(_) => None,
    };
    match message {
        Some(m) => anyhow!(m),
        None => anyhow::Error::new(err).context("request failed, try again"),
    }
}
