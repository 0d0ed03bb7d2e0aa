use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                script src="https://unpkg.com/htmx.org@1.9.12" defer {};
                style {
                    "body { font-family: system-ui, sans-serif; margin: 0; color: #1f2937; }"
                    "main { max-width: 960px; margin: 0 auto; padding: 1.5rem; }"
                    ".card { border: 1px solid #e5e7eb; border-radius: 8px; padding: 1rem 1.5rem; margin-bottom: 1.5rem; }"
                    ".btn { padding: 8px 16px; background: #524ed2; color: white; border: none; border-radius: 4px; cursor: pointer; }"
                    ".bar { background: #524ed2; height: 1.4rem; border-radius: 3px; }"
                }
            }
            body {
                header style="display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,0.1);" {
                    svg
                        xmlns="http://www.w3.org/2000/svg"
                        width="24"
                        height="24"
                        viewBox="0 0 24 24"
                        fill="none"
                        stroke="#524ed2"
                        stroke-width="2"
                        stroke-linecap="round"
                        stroke-linejoin="round"
                    {
                        path stroke="none" d="M0 0h24v24H0z" fill="none" {}
                        path d="M5 12l-2 0l9 -9l9 9l-2 0" {}
                        path d="M5 12v7a2 2 0 0 0 2 2h10a2 2 0 0 0 2 -2v-7" {}
                        path d="M9 21v-6a2 2 0 0 1 2 -2h2a2 2 0 0 1 2 2v6" {}
                    }
                    h3 { "Análisis de Propiedades" }
                    nav {
                        a href="/" style="margin-right: 1rem;" { "Buscar" }
                        a href="/compare" { "Comparar" }
                    }
                }
                (content)
            }
        }
    }
}
