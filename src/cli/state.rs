//! State command - dump every stored slot for one vertex

use anyhow::Result;
use console::style;
use serde_json::json;
use vertex_actors::actor::Slot;
use vertex_actors::config::Config;
use vertex_actors::models::VertexId;

pub fn run(config: &Config, vertex: VertexId, json: bool) -> Result<()> {
    let store = super::open_store(config)?;
    let addresses = store.addresses_for_vertex(vertex)?;

    let mut actors = Vec::with_capacity(addresses.len());
    for address in addresses {
        let state = store.load(&address)?;
        actors.push((address, state));
    }

    if json {
        let value: Vec<_> = actors
            .iter()
            .map(|(address, state)| {
                let slots: serde_json::Map<String, serde_json::Value> = Slot::ALL
                    .iter()
                    .filter(|slot| !state.get(**slot).is_empty())
                    .map(|slot| (slot.name().to_string(), json!(state.get(*slot))))
                    .collect();
                json!({ "address": address.to_string(), "state": slots })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if actors.is_empty() {
        println!(
            "{} No stored state for vertex {}",
            style("[--]").dim(),
            style(vertex).cyan()
        );
        return Ok(());
    }

    println!("\nState for vertex {}\n", style(vertex).cyan().bold());
    for (address, state) in &actors {
        println!("  {}", style(address).bold());
        for slot in Slot::ALL {
            let list = state.get(slot);
            if list.is_empty() {
                continue;
            }
            println!(
                "      {} ({}): {}",
                style(slot.name()).green(),
                list.len(),
                list
            );
        }
    }
    println!();

    Ok(())
}
