use dioxus::prelude::*;
use partner_map_shared::controller::OrgMap;
use partner_map_shared::theme::Theme;

fn theme_from_label(label: &str) -> Option<Theme> {
    Theme::ALL.into_iter().find(|t| t.label() == label)
}

#[component]
pub fn ThemeSelector(org_map: Signal<OrgMap>) -> Element {
    let current = org_map.read().theme();

    rsx! {
        select {
            class: "theme-selector",
            "aria-label": "Map style",
            onchange: move |evt: Event<FormData>| {
                if let Some(theme) = theme_from_label(&evt.value()) {
                    org_map.write().set_theme(theme);
                }
            },
            for theme in Theme::ALL {
                option {
                    value: theme.label(),
                    selected: theme == current,
                    {theme.label()}
                }
            }
        }
    }
}
