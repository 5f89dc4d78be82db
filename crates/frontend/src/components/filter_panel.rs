use dioxus::prelude::*;
use partner_map_shared::controller::OrgMap;
use wasm_bindgen::JsCast;

const FILTER_CONTAINER_ID: &str = "type-filter";

/// Values of every checked checkbox inside the container.
fn checked_values(container_id: &str) -> Option<Vec<String>> {
    let document = web_sys::window()?.document()?;
    let nodes = document
        .query_selector_all(&format!("#{container_id} input[type=checkbox]:checked"))
        .ok()?;
    let values = (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|input| input.value())
        .collect();
    Some(values)
}

/// One checkbox per category. A single change listener on the container
/// reads all checked boxes and hands them to the controller.
#[component]
pub fn FilterPanel(org_map: Signal<OrgMap>) -> Element {
    let entries = org_map.read().filters().entries().to_vec();
    if entries.is_empty() {
        return rsx! {};
    }

    rsx! {
        div { class: "panel",
            h3 { "Organization Type" }
            div {
                id: FILTER_CONTAINER_ID,
                class: "type-filter",
                onchange: move |_| {
                    if let Some(checked) = checked_values(FILTER_CONTAINER_ID) {
                        org_map.write().on_filter_change(checked);
                    }
                },
                for (i, entry) in entries.into_iter().enumerate() {
                    div { key: "{entry.category}", class: "filter-option",
                        input {
                            r#type: "checkbox",
                            id: "type-filter-{i}",
                            name: "type",
                            value: "{entry.category}",
                            checked: entry.checked,
                        }
                        label { r#for: "type-filter-{i}",
                            span {
                                class: "color-box",
                                style: "background-color: {entry.color};",
                            }
                            "{entry.category}"
                        }
                    }
                }
            }
        }
    }
}
