use crate::domain::PriceStats;
use maud::{html, Markup};

pub const GREETING: &str = "¡Hola! Soy tu bot de búsqueda. Usa /buscar para iniciar.";
pub const ASK_QUERY: &str = "🔍 ¿Qué artículo deseas buscar?";
pub const CANCELLED: &str = "Búsqueda cancelada.";
pub const NO_RESULTS: &str = "❌ No encontré resultados.";
pub const SEARCH_FAILED: &str = "⚠️ Ocurrió un error durante la búsqueda. Intenta de nuevo más tarde.";
pub const IDLE_HINT: &str = "Usa /buscar para iniciar una búsqueda.";
pub const PRODUCTS_FOUND: &str = "Se encontraron los siguientes productos:";

// Telegram captions are capped at 1024 characters.
const MAX_QUERY_CHARS: usize = 100;

pub fn searching(query: &str) -> Markup {
    html! {
        "Buscando '" b { (short(query)) } "'... ⏳"
    }
}

pub fn stats_summary(query: &str, stats: &PriceStats) -> Markup {
    html! {
        "📌 Estadísticas para '" b { (short(query)) } "'\n"
        "Resultados: " code { (stats.count) } "\n"
        "Precio promedio: " code { (money(stats.mean)) } "\n"
        "Precio máximo: " code { (money(stats.max)) } "\n"
        "Precio mínimo: " code { (money(stats.min)) }
    }
}

pub fn results_caption(count: usize, query: &str) -> String {
    format!("📊 {count} resultados para '{}'", short(query))
}

pub fn price_alert(price: &str) -> String {
    format!("El precio es: {price}")
}

pub fn no_products(query: &str) -> String {
    format!("No se encontraron productos para '{}'.", short(query))
}

/// `$12,345.50`
pub fn money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

fn short(query: &str) -> String {
    query.trim().chars().take(MAX_QUERY_CHARS).collect()
}
