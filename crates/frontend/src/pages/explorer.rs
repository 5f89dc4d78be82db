use dioxus::logger::tracing;
use dioxus::prelude::*;
use partner_map_shared::config::MapConfig;
use partner_map_shared::controller::OrgMap;

use crate::api;
use crate::components::filter_panel::FilterPanel;
use crate::components::map_view::MapView;
use crate::components::theme_selector::ThemeSelector;

/// "Showing 3 of 10 organizations"
fn summary_line(shown: usize, total: usize) -> String {
    let noun = if total == 1 { "organization" } else { "organizations" };
    if shown == total {
        format!("Showing {total} {noun}")
    } else {
        format!("Showing {shown} of {total} {noun}")
    }
}

#[component]
pub fn Explorer() -> Element {
    let config = use_hook(MapConfig::default);

    // The controller owns all page state; children get the signal explicitly.
    let mut org_map = use_signal(|| OrgMap::new(config.theme));
    let viewport = use_signal(|| config.initial_view);

    // Single fetch. On failure the map stays empty and the error is only logged.
    let data_url = config.data_url;
    let _loader = use_resource(move || async move {
        match api::fetch_partner_orgs(data_url).await {
            Ok(records) => {
                org_map.write().initialize(records);
            }
            Err(e) => tracing::error!("Error loading the data: {e}"),
        }
    });

    let (shown, total, loaded) = {
        let map = org_map.read();
        (map.markers().len(), map.records().len(), map.is_initialized())
    };

    rsx! {
        div { class: "app",
            div { class: "header",
                h1 { "Partner Organizations" }
                ThemeSelector { org_map: org_map }
            }

            div { class: "sidebar",
                FilterPanel { org_map: org_map }
                if loaded {
                    p { class: "summary", {summary_line(shown, total)} }
                }
            }

            MapView { org_map: org_map, viewport: viewport }
        }
    }
}
