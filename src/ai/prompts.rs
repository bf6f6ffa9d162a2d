//! Prompt catalogue for the marketing site.
//!
//! Each builder renders the prompt text and, for structured replies, the
//! shape the model must answer with. Reply types use the camelCase names the
//! frontend reads.

use crate::ai::ResponseShape;

pub struct Prompt {
    pub text: String,
    pub shape: Option<ResponseShape>,
}

impl Prompt {
    fn text(text: String) -> Self {
        Self { text, shape: None }
    }

    fn structured(text: String, shape: ResponseShape) -> Self {
        Self {
            text,
            shape: Some(shape),
        }
    }
}

const NO_MARKDOWN: &str = "Não inclua markdown (como ```json) na resposta.";

#[derive(serde::Deserialize, Debug)]
pub struct QuizAnswers {
    pub vibe: String,
    pub moment: String,
    pub fruits: String,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TasteProfile {
    pub profile_description: String,
    pub cake_suggestion: String,
}

pub fn taste_profile(answers: &QuizAnswers) -> Prompt {
    let text = format!(
        "Baseado nestas preferências para bolos:\n\
         - Vibe: {}\n\
         - Momento de consumo: {}\n\
         - Preferência por frutas: {}\n\n\
         Crie um \"Perfil de Sabor BoloFlix\" divertido e acolhedor para este usuário \
         em um único parágrafo e sugira um bolo caseiro que combine com esse perfil. \
         Responda com um objeto JSON com as chaves \"profileDescription\" e \
         \"cakeSuggestion\". {}",
        answers.vibe, answers.moment, answers.fruits, NO_MARKDOWN
    );
    Prompt::structured(
        text,
        ResponseShape::object([
            ("profileDescription", ResponseShape::String),
            ("cakeSuggestion", ResponseShape::String),
        ]),
    )
}

#[derive(serde::Deserialize, Debug)]
pub struct DeliverySlot {
    pub day: String,
    pub time: String,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, PartialEq)]
pub struct Availability {
    pub available: bool,
    pub message: String,
}

/// Capacity is simulated by the model; nothing is reserved.
pub fn check_availability(slot: &DeliverySlot) -> Prompt {
    let text = format!(
        "Aja como o sistema de logística da BoloFlix. Um cliente quer agendar uma entrega \
         para {day} no período da {time}. Na maioria das vezes (cerca de 80%) a entrega \
         está disponível e a mensagem deve ser positiva. Ocasionalmente (cerca de 20%) \
         está lotada: a mensagem deve ser gentil e sugerir outro horário. Varie as \
         mensagens para soarem naturais. Responda com um objeto JSON com as chaves \
         \"available\" (booleano) e \"message\" (texto). {no_markdown}",
        day = slot.day,
        time = slot.time,
        no_markdown = NO_MARKDOWN
    );
    Prompt::structured(
        text,
        ResponseShape::object([
            ("available", ResponseShape::Boolean),
            ("message", ResponseShape::String),
        ]),
    )
}

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeRequest {
    pub plan_title: String,
    pub customer_name: String,
    pub delivery_day: String,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, PartialEq)]
pub struct WelcomeMessage {
    pub message: String,
}

impl WelcomeMessage {
    /// Used whenever the model cannot produce a greeting.
    pub fn fallback() -> Self {
        Self {
            message: "Sua assinatura foi criada com sucesso! Bem-vindo(a) à família BoloFlix."
                .to_string(),
        }
    }
}

pub fn welcome_message(request: &WelcomeRequest) -> Prompt {
    let text = format!(
        "Aja como a voz da marca BoloFlix. \"{}\" acabou de assinar o plano \"{}\" e \
         receberá as entregas toda {}. Escreva uma mensagem de boas-vindas curta (2-3 \
         frases), calorosa e nostálgica, mencionando o nome, o plano e o dia da entrega. \
         Responda com um objeto JSON com uma única chave \"message\". {}",
        request.customer_name, request.plan_title, request.delivery_day, NO_MARKDOWN
    );
    Prompt::structured(
        text,
        ResponseShape::object([("message", ResponseShape::String)]),
    )
}

pub fn investor_pitch() -> Prompt {
    Prompt::text(
        "Crie um pitch conciso e persuasivo (3-4 parágrafos) para investidores da \
         BoloFlix, um serviço de assinatura de bolos caseiros com temas mensais. Aborde o \
         problema, a solução, o mercado e o modelo de negócio. Use markdown simples para \
         títulos e listas."
            .to_string(),
    )
}

#[derive(serde::Deserialize, serde::Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BusinessModelCanvas {
    pub key_partners: Vec<String>,
    pub key_activities: Vec<String>,
    pub key_resources: Vec<String>,
    pub value_propositions: Vec<String>,
    pub customer_relationships: Vec<String>,
    pub channels: Vec<String>,
    pub customer_segments: Vec<String>,
    pub cost_structure: Vec<String>,
    pub revenue_streams: Vec<String>,
}

const CANVAS_SECTIONS: [&str; 9] = [
    "keyPartners",
    "keyActivities",
    "keyResources",
    "valuePropositions",
    "customerRelationships",
    "channels",
    "customerSegments",
    "costStructure",
    "revenueStreams",
];

pub fn business_model_canvas() -> Prompt {
    let text = format!(
        "Gere um Business Model Canvas para a BoloFlix, um serviço de assinatura de bolos \
         caseiros para famílias e amantes de comida nostálgica, com caixas temáticas \
         entregues semanal ou mensalmente. Para cada uma das seções ({}) liste de 2 a 4 \
         itens curtos. Responda com um único objeto JSON. {}",
        CANVAS_SECTIONS.join(", "),
        NO_MARKDOWN
    );
    Prompt::structured(
        text,
        ResponseShape::object(
            CANVAS_SECTIONS.map(|section| (section, ResponseShape::string_list())),
        ),
    )
}

pub fn financial_estimate() -> Prompt {
    Prompt::text(
        "Forneça uma estimativa financeira simplificada para o primeiro ano da BoloFlix. \
         Considere três planos: Curioso (R$60/mês, 50 assinantes), Apaixonado (R$120/mês, \
         30 assinantes) e Família (R$200/mês, 20 assinantes). Estime os custos mensais de \
         ingredientes, embalagem, entrega e marketing, e calcule receita, custos e lucro \
         mensais e anuais. Apresente em markdown simples com títulos e listas."
            .to_string(),
    )
}

#[derive(serde::Deserialize, serde::Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
    pub favorite_cake: String,
}

pub fn testimonials() -> Prompt {
    let text = format!(
        "Gere 3 depoimentos fictícios de clientes felizes da BoloFlix, com tom caloroso, \
         pessoal e nostálgico. Cada depoimento tem \"quote\", \"author\" e \
         \"favoriteCake\". Responda com um array JSON de 3 objetos. {}",
        NO_MARKDOWN
    );
    Prompt::structured(
        text,
        ResponseShape::array_of(ResponseShape::object([
            ("quote", ResponseShape::String),
            ("author", ResponseShape::String),
            ("favoriteCake", ResponseShape::String),
        ])),
    )
}

#[derive(serde::Deserialize, Debug, Default)]
pub struct CakeCreation {
    pub base: Option<String>,
    pub filling: Option<String>,
    pub topping: Option<String>,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCake {
    pub cake_name: String,
    pub description: String,
}

pub fn custom_cake_description(creation: &CakeCreation) -> Prompt {
    let pick = |value: &Option<String>| -> String {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("à escolha do confeiteiro")
            .to_string()
    };
    let text = format!(
        "Um cliente da BoloFlix montou um bolo personalizado:\n\
         - Massa: {}\n\
         - Recheio: {}\n\
         - Cobertura: {}\n\n\
         Aja como um mestre confeiteiro criativo e nostálgico: crie um nome divertido e \
         um parágrafo de descrição acolhedora para este bolo. Responda com um objeto JSON \
         com as chaves \"cakeName\" e \"description\". {}",
        pick(&creation.base),
        pick(&creation.filling),
        pick(&creation.topping),
        NO_MARKDOWN
    );
    Prompt::structured(
        text,
        ResponseShape::object([
            ("cakeName", ResponseShape::String),
            ("description", ResponseShape::String),
        ]),
    )
}

#[derive(serde::Deserialize, serde::Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CakeOfTheMonth {
    pub cake_name: String,
    pub description: String,
    pub flavor_notes: Vec<String>,
}

pub fn cake_of_the_month() -> Prompt {
    let text = format!(
        "Crie os detalhes do Bolo do Mês da BoloFlix com o tema \"Sabores da Infância\": \
         um bolo de fubá com goiabada. Gere um nome criativo, uma descrição nostálgica de \
         2-3 frases e 3 notas de sabor. Responda com um objeto JSON com as chaves \
         \"cakeName\", \"description\" e \"flavorNotes\" (array de textos). {}",
        NO_MARKDOWN
    );
    Prompt::structured(
        text,
        ResponseShape::object([
            ("cakeName", ResponseShape::String),
            ("description", ResponseShape::String),
            ("flavorNotes", ResponseShape::string_list()),
        ]),
    )
}
