use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail};
use checklist_core::controller::Controller;
use checklist_core::render::Renderer;
use checklist_core::service::TaskService;
use checklist_core::view::FilterMode;
use tracing::debug;

/// One parsed user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Add(String),
    Edit(u64),
    New,
    SetInput(String),
    Submit,
    Toggle(u64),
    Remove(u64),
    CompleteAll,
    ClearCompleted,
    Filter(FilterMode),
    List,
    Refresh,
    Help,
    Quit,
}

pub fn parse_event(line: &str) -> anyhow::Result<Option<Event>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };

    let event = match word {
        "add" => Event::Add(rest.to_string()),
        "edit" => Event::Edit(parse_id(rest)?),
        "new" => Event::New,
        "set" => Event::SetInput(rest.to_string()),
        "submit" | "save" => Event::Submit,
        "toggle" => Event::Toggle(parse_id(rest)?),
        "rm" | "delete" => Event::Remove(parse_id(rest)?),
        "done-all" => Event::CompleteAll,
        "clear" => Event::ClearCompleted,
        "filter" => Event::Filter(rest.parse()?),
        "list" | "ls" | "show" => Event::List,
        "refresh" => Event::Refresh,
        "help" => Event::Help,
        "quit" | "exit" => Event::Quit,
        other => bail!("unknown command: {other} (try 'help')"),
    };

    Ok(Some(event))
}

fn parse_id(text: &str) -> anyhow::Result<u64> {
    text.trim()
        .parse()
        .map_err(|_| anyhow!("expected a task id, got: {text}"))
}

/// Interactive session: mount (initial fetch), then apply events line by
/// line, re-rendering the visible list after anything that changes it.
pub async fn run_session<S: TaskService>(
    widget: &mut Controller<S>,
    renderer: &mut Renderer,
) -> anyhow::Result<()> {
    println!("Loading...");
    widget.refresh().await;
    render(widget, renderer)?;

    let stdin = io::stdin();
    loop {
        prompt(widget)?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            debug!("stdin closed; ending session");
            return Ok(());
        }

        let event = match parse_event(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(err) => {
                println!("{err:#}");
                continue;
            }
        };

        if !apply_event(widget, renderer, event).await? {
            return Ok(());
        }
    }
}

/// One-shot mode: mount, apply a single event, exit.
pub async fn run_once<S: TaskService>(
    widget: &mut Controller<S>,
    renderer: &mut Renderer,
    args: &[String],
) -> anyhow::Result<()> {
    let line = args.join(" ");
    let event = parse_event(&line)?.ok_or_else(|| anyhow!("empty command"))?;

    widget.refresh().await;
    apply_event(widget, renderer, event).await?;
    Ok(())
}

async fn apply_event<S: TaskService>(
    widget: &mut Controller<S>,
    renderer: &mut Renderer,
    event: Event,
) -> anyhow::Result<bool> {
    debug!(?event, "applying session event");

    match event {
        Event::Add(title) => {
            widget.begin_add();
            widget.set_input(&title);
            if let Some(notice) = widget.submit().await {
                renderer.print_notice(&notice)?;
            }
            render(widget, renderer)?;
        }
        Event::Edit(id) => {
            widget.begin_edit(id);
            if widget.editing() == Some(id) {
                println!("editing task {id}: {}", widget.input());
            } else {
                println!("no task with id {id}");
            }
        }
        Event::New => {
            widget.begin_add();
        }
        Event::SetInput(text) => {
            widget.set_input(&text);
        }
        Event::Submit => {
            if let Some(notice) = widget.submit().await {
                renderer.print_notice(&notice)?;
            }
            render(widget, renderer)?;
        }
        Event::Toggle(id) => {
            widget.toggle(id);
            render(widget, renderer)?;
        }
        Event::Remove(id) => {
            let notice = widget.delete(id);
            renderer.print_notice(&notice)?;
            render(widget, renderer)?;
        }
        Event::CompleteAll => {
            widget.complete_all();
            render(widget, renderer)?;
        }
        Event::ClearCompleted => {
            widget.clear_completed();
            render(widget, renderer)?;
        }
        Event::Filter(mode) => {
            widget.set_filter(mode);
            render(widget, renderer)?;
        }
        Event::List => {
            render(widget, renderer)?;
        }
        Event::Refresh => {
            widget.refresh().await;
            render(widget, renderer)?;
        }
        Event::Help => {
            print_help();
        }
        Event::Quit => return Ok(false),
    }

    Ok(true)
}

fn render<S: TaskService>(
    widget: &Controller<S>,
    renderer: &mut Renderer,
) -> anyhow::Result<()> {
    renderer.print_task_table(&widget.visible())?;
    renderer.print_summary(
        widget.completed_count(),
        widget.total_count(),
        widget.filter(),
    )?;
    Ok(())
}

fn prompt<S: TaskService>(widget: &Controller<S>) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    match widget.editing() {
        Some(id) => write!(out, "[{} #{id}]> ", widget.primary_label())?,
        None => write!(out, "[{}]> ", widget.primary_label())?,
    }
    out.flush()?;
    Ok(())
}

fn print_help() {
    println!(
        "commands:\n  \
         add <title>      create a task\n  \
         edit <id>        load a task's title for editing\n  \
         set <text>       replace the input buffer\n  \
         submit           run the primary action (Add or Update)\n  \
         new              back to add mode, clearing the buffer\n  \
         toggle <id>      flip a task's completed flag\n  \
         rm <id>          delete a task (local only)\n  \
         done-all         mark every task completed\n  \
         clear            drop all completed tasks\n  \
         filter <mode>    all | completed | uncompleted\n  \
         list             re-render the visible tasks\n  \
         refresh          re-fetch from the service\n  \
         quit             leave the session"
    );
}
