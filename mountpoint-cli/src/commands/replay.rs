use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Args;
use mountpoint_core::plugin_api::{Element, Plugin};
use mountpoint_core::{
    EventBus, EventSeq, HostEvent, MemoryEventBus, MemoryStore, NodeSnapshot, PluginRenderer,
    RendererConfig, SurfaceSnapshot,
};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::config::ConfigLoader;
use crate::demo::DemoPlugin;
use crate::script::ReplayScript;

#[derive(Args)]
pub struct ReplayArgs {
    /// Script to replay
    pub script: PathBuf,

    /// Built-in plugin to mount
    #[arg(long, value_enum, default_value = "list")]
    pub plugin: DemoPlugin,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Extra config file layered over user and project config
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Final state of a replayed session
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub surface: SurfaceSnapshot,
    /// Toast payloads seen on the bus, in order
    pub toasts: Vec<serde_json::Value>,
    pub errors: Vec<StepError>,
}

#[derive(Debug, Serialize)]
pub struct StepError {
    /// 1-based step number
    pub step: usize,
    pub message: String,
}

pub fn run(args: ReplayArgs) -> Result<()> {
    let script = ReplayScript::load(&args.script)?;
    let config = ConfigLoader::load(args.config.as_deref())?;

    let report = replay(&script, args.plugin.build(), &config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }

    if !report.errors.is_empty() {
        bail!("{} step(s) failed", report.errors.len());
    }
    Ok(())
}

/// Run every step of `script` against a fresh renderer mounting `plugin`.
///
/// A failing step is recorded and the replay moves on to the next one.
pub fn replay(
    script: &ReplayScript,
    plugin: Arc<dyn Plugin>,
    config: &RendererConfig,
) -> ReplayReport {
    let bus = Arc::new(MemoryEventBus::new(config.bus.capacity));
    let mut observer = bus.subscribe();
    let mut renderer = PluginRenderer::new(config, bus.clone());
    renderer.render();

    let store = MemoryStore::new();
    store.set_active_plugin(plugin, script.data.clone(), script.path.clone());
    store.set_search_query(script.query.clone());

    let mut toasts = Vec::new();
    let mut errors = Vec::new();

    for (index, step) in script.steps.iter().enumerate() {
        let number = index + 1;

        if let Some(query) = &step.query {
            store.set_search_query(query.clone());
        }
        if let Some(data) = &step.data {
            store.set_plugin_data(data.clone());
        }
        if let Some(event) = &step.event {
            let seq = bus.publish(event.clone());
            tracing::debug!(step = number, seq, kind = event.kind(), "Event published");
        }

        // pump stops at the first failure, so keep going until the queue is empty
        loop {
            match renderer.pump(&store) {
                Ok(_) => break,
                Err(e) => {
                    tracing::warn!(step = number, error = %e, "Step failed");
                    errors.push(StepError {
                        step: number,
                        message: e.to_string(),
                    });
                }
            }
        }

        collect_toasts(&mut observer, &mut toasts);
    }

    tracing::info!(
        steps = script.steps.len(),
        toasts = toasts.len(),
        errors = errors.len(),
        "Replay finished"
    );

    ReplayReport {
        surface: renderer.surface().snapshot(),
        toasts,
        errors,
    }
}

fn collect_toasts(
    rx: &mut broadcast::Receiver<(EventSeq, HostEvent)>,
    out: &mut Vec<serde_json::Value>,
) {
    loop {
        match rx.try_recv() {
            Ok((_, HostEvent::Toast { detail })) => out.push(detail),
            Ok(_) => {}
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Toast observer lagged behind the event bus");
            }
            Err(_) => break,
        }
    }
}

/// Human-readable rendering of a report
pub fn format_report(report: &ReplayReport) -> String {
    let mut out = String::from("Surface\n");

    match &report.surface.loader {
        Some(loader) => {
            let state = if loader.visible { "visible" } else { "hidden" };
            out.push_str(&format!("  loader ({}): {}\n", loader.label, state));
        }
        None => out.push_str("  loader: not rendered\n"),
    }

    for node in &report.surface.nodes {
        match node {
            NodeSnapshot::Stylesheet { href, .. } => {
                out.push_str(&format!("  stylesheet {href}\n"));
            }
            NodeSnapshot::Container {
                id,
                marker,
                children,
            } => {
                out.push_str(&format!("  container {marker} [{id}]\n"));
                for child in children {
                    write_element(&mut out, child, 2);
                }
            }
        }
    }

    if !report.toasts.is_empty() {
        out.push_str(&format!("Toasts ({})\n", report.toasts.len()));
        for toast in &report.toasts {
            out.push_str(&format!("  {toast}\n"));
        }
    }

    if !report.errors.is_empty() {
        out.push_str("Errors\n");
        for error in &report.errors {
            out.push_str(&format!("  step {}: {}\n", error.step, error.message));
        }
    }

    out
}

fn write_element(out: &mut String, element: &Element, depth: usize) {
    let indent = "  ".repeat(depth);
    let attrs: String = element
        .attributes
        .iter()
        .map(|(name, value)| format!(" {name}=\"{value}\""))
        .collect();

    if element.children.is_empty() {
        let text = element.text.as_deref().unwrap_or_default();
        out.push_str(&format!(
            "{indent}<{tag}{attrs}>{text}</{tag}>\n",
            tag = element.tag
        ));
        return;
    }

    out.push_str(&format!("{indent}<{}{attrs}>\n", element.tag));
    if let Some(text) = &element.text {
        out.push_str(&format!("{indent}  {text}\n"));
    }
    for child in &element.children {
        write_element(out, child, depth + 1);
    }
    out.push_str(&format!("{indent}</{}>\n", element.tag));
}
