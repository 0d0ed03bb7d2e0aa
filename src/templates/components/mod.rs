use maud::{html, Markup};

pub mod card;
pub mod error;

pub use card::card;
pub use error::{error_page, notice};

pub fn button(label: &str) -> Markup {
    html! {
        button type="submit" class="btn" { (label) }
    }
}
