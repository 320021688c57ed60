/*
[INPUT]:  Parsed commands, services and the preference store
[OUTPUT]: Container-driven actions with styled terminal output
[POS]:    CLI command handlers
[UPDATE]: When adding commands or changing their output
*/

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use console::style;
use dialoguer::Password;
use taskdeck_adapter::{FileUpload, TaskStatus};

use super::{AvatarCommand, Command, FileCommand, TaskCommand};
use taskdeck_app::containers::{Notice, NoticeLevel, Phase, Route, ViewCell};
use taskdeck_app::prefs::{self, PreferenceStore};
use taskdeck_app::{Dashboard, Profile, Services, SignInForm, SignUpForm};

pub struct CommandContext {
    pub services: Services,
    pub prefs: Arc<dyn PreferenceStore>,
}

pub async fn run(ctx: &CommandContext, command: Command) -> Result<()> {
    match command {
        Command::SignUp {
            email,
            name,
            password,
        } => sign_up(ctx, email, name, password).await,
        Command::Confirm {
            email,
            code,
            password,
        } => confirm(ctx, email, code, password).await,
        Command::SignIn { email, password } => sign_in(ctx, email, password).await,
        Command::SignOut => sign_out(ctx).await,
        Command::Whoami => whoami(ctx).await,
        Command::Tasks(command) => tasks(ctx, command).await,
        Command::Files(command) => files(ctx, command).await,
        Command::Avatar(command) => avatar(ctx, command).await,
    }
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => Password::new()
            .with_prompt("Password")
            .interact()
            .context("read password"),
    }
}

async fn flush<S: Clone>(cell: &ViewCell<S>) {
    for notice in cell.drain_notices().await {
        print_notice(&notice);
    }
    if let Some(route) = cell.take_navigation().await {
        let hint = match route {
            Route::Login => "next: taskdeck sign-in",
            Route::SignUp => "next: taskdeck confirm",
            Route::Dashboard => "next: taskdeck tasks list",
            Route::Profile => "next: taskdeck files list",
        };
        println!("{}", style(hint).dim());
    }
}

fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Success => println!("{}", style(&notice.message).green()),
        NoticeLevel::Warning => println!("{}", style(&notice.message).yellow()),
        NoticeLevel::Error => eprintln!("{}", style(&notice.message).red()),
    }
}

fn not_signed_in() -> Result<()> {
    println!("{}", style("Not signed in").yellow());
    Ok(())
}

async fn sign_up(
    ctx: &CommandContext,
    email: String,
    name: String,
    password: Option<String>,
) -> Result<()> {
    let form = SignUpForm::new(ctx.services.auth.clone());
    form.set_name(name).await;
    form.set_email(email).await;
    form.set_password(password_or_prompt(password)?).await;
    form.submit().await;

    flush(form.cell()).await;
    match form.state().await.error {
        Some(error) => Err(anyhow!(error)),
        None => Ok(()),
    }
}

async fn confirm(
    ctx: &CommandContext,
    email: String,
    code: String,
    password: Option<String>,
) -> Result<()> {
    let form = SignUpForm::new(ctx.services.auth.clone());
    form.set_email(email).await;
    form.set_password(password_or_prompt(password)?).await;
    form.set_otp(&code).await;
    form.confirm().await;

    flush(form.cell()).await;
    match form.state().await.error {
        Some(error) => Err(anyhow!(error)),
        None => Ok(()),
    }
}

async fn sign_in(ctx: &CommandContext, email: String, password: Option<String>) -> Result<()> {
    let form = SignInForm::new(ctx.services.auth.clone());
    form.set_email(email).await;
    form.set_password(password_or_prompt(password)?).await;
    let signed_in = form.submit().await;

    flush(form.cell()).await;
    if signed_in {
        return Ok(());
    }
    let error = form
        .state()
        .await
        .error
        .unwrap_or_else(|| "Sign in failed".to_string());
    Err(anyhow!(error))
}

async fn sign_out(ctx: &CommandContext) -> Result<()> {
    let dashboard = Dashboard::new(ctx.services.clone());
    let signed_out = dashboard.sign_out().await;
    flush(dashboard.cell()).await;
    if !signed_out {
        return Err(anyhow!("sign out failed; the local session was cleared"));
    }
    println!("Signed out");
    Ok(())
}

async fn whoami(ctx: &CommandContext) -> Result<()> {
    match ctx.services.auth.get_current_user().await {
        Some(user) => {
            println!("{}", style(user.login_id()).bold());
            if let Some(name) = &user.name {
                println!("name:     {name}");
            }
            println!("user id:  {}", user.user_id);
            println!("identity: {}", user.identity_id);
            Ok(())
        }
        None => not_signed_in(),
    }
}

async fn tasks(ctx: &CommandContext, command: TaskCommand) -> Result<()> {
    let dashboard = Dashboard::new(ctx.services.clone());
    if dashboard.mount().await.is_none() {
        return not_signed_in();
    }
    let list = dashboard.task_list();

    let succeeded = match command {
        TaskCommand::List => true,
        TaskCommand::Add {
            title,
            content,
            status,
        } => {
            dashboard.open_task_form().await;
            let form = dashboard.task_form();
            form.set_title(title).await;
            if let Some(content) = content {
                form.set_content(content).await;
            }
            form.set_status(status).await;
            dashboard.submit_task_form().await;
            flush(form.cell()).await;
            if let Some(error) = form.state().await.error {
                return Err(anyhow!(error));
            }
            true
        }
        TaskCommand::Done { id } => list.set_status(&id, TaskStatus::Done).await,
        TaskCommand::Status { id, status } => list.set_status(&id, status).await,
        TaskCommand::Delete { id } => list.delete(&id).await,
    };

    flush(list.cell()).await;
    let state = list.state().await;
    if let Some(error) = state.error {
        return Err(anyhow!(error));
    }
    if !succeeded {
        return Err(anyhow!("task change was not applied"));
    }
    if state.tasks.is_empty() {
        println!("{}", style("No tasks").dim());
    }
    for task in &state.tasks {
        let marker = if task.is_done() { "[x]" } else { "[ ]" };
        println!(
            "{} {} {} {}",
            marker,
            style(&task.id).dim(),
            style(&task.title).bold(),
            style(task.status).cyan()
        );
        if let Some(content) = &task.content {
            println!("      {content}");
        }
    }
    Ok(())
}

async fn files(ctx: &CommandContext, command: FileCommand) -> Result<()> {
    let profile = Profile::new(ctx.services.clone(), ctx.prefs.clone());
    let Some(user) = profile.mount().await else {
        return not_signed_in();
    };

    match command {
        FileCommand::List => print_files(&profile).await,
        FileCommand::Upload { path } => {
            let file = FileUpload::from_path(&path)
                .await
                .with_context(|| format!("read {}", path.display()))?;
            let url = profile.upload(file).await;
            flush(profile.cell()).await;
            if let Some(url) = url {
                println!("avatar: {url}");
            }
            Ok(())
        }
        FileCommand::Delete { path } => {
            let deleted = profile.delete_file(&path).await;
            flush(profile.cell()).await;
            if !deleted {
                return Err(anyhow!("could not delete {path}"));
            }
            Ok(())
        }
        FileCommand::Download { name, out } => {
            let file = ctx
                .services
                .storage
                .download_file(&user.identity_id, &name)
                .await
                .context("download file")?;
            let out = out.unwrap_or_else(|| PathBuf::from(&name));
            tokio::fs::write(&out, &file.bytes)
                .await
                .with_context(|| format!("write {}", out.display()))?;
            println!("{} bytes -> {}", file.bytes.len(), out.display());
            Ok(())
        }
    }
}

async fn print_files(profile: &Profile) -> Result<()> {
    flush(profile.cell()).await;
    let state = profile.state().await;
    if state.files.is_empty() {
        println!("{}", style("No files").dim());
    }
    for entry in &state.files {
        let size = entry
            .size_kib()
            .map(|kib| format!("{kib:.1} KiB"))
            .unwrap_or_else(|| "-".to_string());
        let url = entry
            .url
            .clone()
            .unwrap_or_else(|| style("URL unavailable").red().to_string());
        let is_avatar = state
            .avatar
            .as_deref()
            .is_some_and(|avatar| taskdeck_app::containers::profile::avatar_matches(avatar, entry));
        let marker = if is_avatar { "*" } else { " " };
        println!("{marker} {}  {size}", style(&entry.path).bold());
        println!("    {url}");
    }
    Ok(())
}

async fn avatar(ctx: &CommandContext, command: AvatarCommand) -> Result<()> {
    match command {
        AvatarCommand::Show => {
            match prefs::avatar(ctx.prefs.as_ref())? {
                Some(url) => println!("{url}"),
                None => println!("{}", style("No avatar set").dim()),
            }
            Ok(())
        }
        AvatarCommand::Set { url } => {
            let profile = Profile::new(ctx.services.clone(), ctx.prefs.clone());
            if profile.mount().await.is_none() {
                return not_signed_in();
            }
            profile.set_avatar(&url).await;
            if let Phase::Ready(user) = profile.state().await.phase {
                println!("avatar set for {}", user.login_id());
            }
            Ok(())
        }
    }
}
