// templates/pages/home.rs

use crate::geocode::MapMarker;
use crate::templates::{card, components::button, desktop_layout, notice};
use maud::{html, Markup};

pub const NO_SNIPPET: &str = "No hay descripción disponible.";

pub struct ListingRow {
    pub index: usize,
    pub title: String,
    pub snippet: Option<String>,
    pub price_label: String,
    pub selected: bool,
}

pub struct HomeVm {
    /// Prefilled search box value.
    pub city: String,
    /// City the rows belong to; empty before the first search.
    pub results_city: String,
    pub notice: Option<String>,
    pub rows: Vec<ListingRow>,
    pub batch: u64,
    pub selected_count: usize,
    pub markers: Vec<MapMarker>,
    pub map_center: (f64, f64),
}

pub fn home_page(vm: &HomeVm) -> Markup {
    desktop_layout(
        "Análisis y Visualización de Propiedades",
        html! {
            main {
                h1 { "Análisis y Visualización de Propiedades" }
                p { "Busque propiedades disponibles en el mercado y compare sus precios." }

                (card("Filtros de Búsqueda", search_form(&vm.city)))

                @if let Some(msg) = &vm.notice {
                    (notice(msg))
                }

                @if !vm.rows.is_empty() {
                    (card(&format!("Propiedades en {}", vm.results_city), listing_list(vm)))
                    (card("Mapa de propiedades", marker_list(vm)))
                }
            }
        },
    )
}

fn search_form(city: &str) -> Markup {
    html! {
        form action="/search" method="post" style="display: flex; gap: 10px; align-items: center;" {
            label for="city" { "Ciudad" }
            input type="text" name="city" id="city" value=(city) style="padding: 8px; font-size: 16px;";
            (button("Buscar propiedades"))
        }
    }
}

fn listing_list(vm: &HomeVm) -> Markup {
    html! {
        ul style="list-style: none; padding: 0;" {
            @for row in &vm.rows {
                li style="margin-bottom: 0.5rem;" {
                    label {
                        input
                            type="checkbox"
                            name="selected"
                            checked[row.selected]
                            hx-post="/select"
                            hx-trigger="change"
                            hx-vals=(format!(r#"{{"index": "{}", "batch": "{}"}}"#, row.index, vm.batch))
                            hx-target="#selection-count"
                            hx-swap="outerHTML";
                        " "
                        strong { (row.title) }
                        " - " (row.snippet.as_deref().unwrap_or(NO_SNIPPET))
                        " - Precio: " (row.price_label)
                    }
                }
            }
        }
        p {
            (selection_count(vm.selected_count))
            " "
            a href="/compare" { "Comparar propiedades seleccionadas" }
        }
    }
}

/// Swapped in by htmx after every checkbox toggle.
pub fn selection_count(count: usize) -> Markup {
    html! {
        span id="selection-count" { (count) " seleccionadas" }
    }
}

fn marker_list(vm: &HomeVm) -> Markup {
    let (lat, lon) = vm.map_center;
    html! {
        @if vm.markers.is_empty() {
            p { "No se pudo ubicar ninguna dirección. Centro del mapa: " (lat) ", " (lon) }
        } @else {
            ul {
                @for marker in &vm.markers {
                    li {
                        a href=(marker.coordinates.osm_link()) title="Haz clic para más información" {
                            (marker.popup)
                        }
                        " (" (marker.coordinates.lat) ", " (marker.coordinates.lon) ")"
                    }
                }
            }
        }
    }
}
