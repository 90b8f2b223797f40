mod http;
mod session;

use checklist_core::cli::{self, GlobalCli};
use checklist_core::config::{self, Config};
use checklist_core::controller::Controller;
use checklist_core::render::Renderer;
use clap::Parser;
use tracing::info;

use crate::http::HttpTaskService;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args = GlobalCli::parse();
    cli::init_tracing(args.verbose, args.quiet)?;

    let mut cfg = Config::load(args.rcfile.as_deref())?;
    cfg.apply_overrides(
        args.rc_overrides
            .iter()
            .map(|kv| (kv.key.clone(), kv.value.clone())),
    );

    let base_url = config::resolve_base_url(&cfg, args.url.as_deref());
    let limit = config::resolve_limit(&cfg, args.limit);
    let filter = config::resolve_filter(&cfg, args.filter)?;

    info!(url = %base_url, limit, %filter, "starting checklist");

    let service = HttpTaskService::new(base_url)?;
    let mut widget = Controller::new(service, limit, filter);
    let mut renderer = Renderer::new(&cfg)?;

    if args.rest.is_empty() {
        session::run_session(&mut widget, &mut renderer).await
    } else {
        session::run_once(&mut widget, &mut renderer, &args.rest).await
    }
}
