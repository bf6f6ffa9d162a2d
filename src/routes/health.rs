#[get("/")]
pub fn index() -> &'static str {
    "🎂 Cozinha da BoloFlix está aberta e funcionando!"
}

#[get("/health_check")]
pub fn health_check() {}
