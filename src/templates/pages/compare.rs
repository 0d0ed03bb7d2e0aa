use crate::domain::listing::format_amount;
use crate::domain::ComparisonSeries;
use crate::templates::{card, components::button, desktop_layout};
use maud::{html, Markup};

pub const NOTHING_SELECTED: &str = "No se seleccionaron propiedades para comparar.";

pub fn compare_page(series: &ComparisonSeries, prediction_enabled: bool) -> Markup {
    desktop_layout(
        "Comparación de Precios de Propiedades",
        html! {
            main {
                h1 { "Comparación de Precios de Propiedades" }

                @if series.is_empty() {
                    p { (NOTHING_SELECTED) }
                    a href="/" { "Volver a la búsqueda" }
                } @else {
                    (card("Precio por propiedad", bar_chart(series)))
                    (card("Detalle", series_table(series)))

                    p {
                        a href="/compare.xlsx" { "Descargar XLSX" }
                        " · "
                        a href="/api/comparison" { "JSON" }
                    }

                    @if prediction_enabled {
                        form action="/predict" method="post" {
                            (button("Predecir tendencia de precios"))
                        }
                    }
                }
            }
        },
    )
}

fn bar_chart(series: &ComparisonSeries) -> Markup {
    let max = series.max_value().unwrap_or(0.0);
    html! {
        div class="chart" {
            @for point in series.points() {
                div style="display: grid; grid-template-columns: 30% 1fr; gap: 8px; align-items: center; margin-bottom: 6px;" {
                    span { (point.label) }
                    div class="bar" style=(format!("width: {:.1}%;", bar_width(point.value, max))) title=(format_amount(point.value)) {}
                }
            }
        }
    }
}

/// Bar width in percent of the largest value.
pub fn bar_width(value: f64, max: f64) -> f64 {
    if max <= 0.0 || value <= 0.0 {
        0.0
    } else {
        (value / max * 100.0).min(100.0)
    }
}

fn series_table(series: &ComparisonSeries) -> Markup {
    html! {
        table style="width: 100%; border-collapse: collapse;" {
            thead {
                tr {
                    th style="text-align: left;" { "Propiedad" }
                    th style="text-align: right;" { "Precio" }
                }
            }
            tbody {
                @for point in series.points() {
                    tr {
                        td { (point.label) }
                        td style="text-align: right;" { (format_amount(point.value)) }
                    }
                }
            }
            @if let Some(avg) = series.average() {
                tfoot {
                    tr {
                        th style="text-align: left;" { "Promedio" }
                        th style="text-align: right;" { (format_amount(avg)) }
                    }
                }
            }
        }
    }
}
