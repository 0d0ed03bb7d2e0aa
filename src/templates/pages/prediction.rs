use crate::templates::{card, desktop_layout, notice};
use maud::{html, Markup};

pub fn prediction_page(city: &str, outcome: Result<&str, String>) -> Markup {
    desktop_layout(
        "Predicción de precios",
        html! {
            main {
                h1 { "Predicción de tendencia de precios" }
                @match outcome {
                    Ok(text) => {
                        (card(&format!("Tendencia en {city}"), html! { p { (text) } }))
                    }
                    Err(msg) => {
                        (notice(&msg))
                    }
                }
                a href="/compare" { "Volver a la comparación" }
            }
        },
    )
}
