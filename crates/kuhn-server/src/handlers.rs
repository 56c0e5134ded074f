use crate::card_image;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use kuhn_cards::Variant;
use kuhn_coordinator::Registry;
use kuhn_core::{Config, ID};
use kuhn_records::{SessionKind, SessionRecord};
use kuhn_room::{Event, Protocol};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct CreateSession {
    kind: String,
    variant: String,
    #[serde(default = "default_capacity")]
    capacity: usize,
    #[serde(default)]
    public: bool,
}

fn default_capacity() -> usize {
    2
}

fn parse_kind(s: &str) -> Result<SessionKind, String> {
    match s {
        "duel" => Ok(SessionKind::Duel),
        "duel_with_bot" => Ok(SessionKind::DuelWithBot),
        "tournament" => Ok(SessionKind::Tournament),
        "tournament_with_bots" => Ok(SessionKind::TournamentWithBots),
        other => Err(format!("unknown session kind: {other}")),
    }
}

fn parse_variant(s: &str) -> Result<Variant, String> {
    match s {
        "three" => Ok(Variant::Three),
        "four" => Ok(Variant::Four),
        other => Err(format!("unknown variant: {other}")),
    }
}

/// Parses the `game_type` query param (`3`/`4`) used by the `bot`/`random`
/// session-id keywords, which may need to create a fresh session.
fn parse_variant_numeric(s: &str) -> Result<Variant, String> {
    s.parse::<u8>().map_err(|_| format!("unknown game_type: {s}"))?.try_into()
}

/// `POST /session` — opens a new session and returns its id for the first
/// client to pass to `/play/{session_id}`.
pub async fn start(registry: web::Data<Arc<Registry>>, body: web::Json<CreateSession>) -> impl Responder {
    let kind = match parse_kind(&body.kind) {
        Ok(k) => k,
        Err(e) => return HttpResponse::BadRequest().body(e),
    };
    let variant = match parse_variant(&body.variant) {
        Ok(v) => v,
        Err(e) => return HttpResponse::BadRequest().body(e),
    };
    let id = registry.create(kind, variant, body.capacity, body.public).await;
    HttpResponse::Ok().json(serde_json::json!({ "session_id": id.to_string() }))
}

/// `GET /play/{session_id}?token=...` — registers the caller's token with
/// the session's Waiting Room and bridges its `PlayerChannel` onto the
/// WebSocket, mirroring the reference bridge's select-loop pump.
pub async fn enter(
    registry: web::Data<Arc<Registry>>,
    config: web::Data<Config>,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
    body: web::Payload,
    req: HttpRequest,
) -> impl Responder {
    let Some(token) = query.get("token").cloned() else {
        return HttpResponse::BadRequest()
            .body("missing token query parameter")
            .map_into_right_body();
    };

    let keyword = path.into_inner();
    let resolved_randomly = keyword == "random";
    let id: ID<SessionRecord> = match keyword.as_str() {
        "bot" => {
            let variant = match query.get("game_type").map(|s| parse_variant_numeric(s)).unwrap_or(Err("missing game_type query parameter".to_string())) {
                Ok(v) => v,
                Err(e) => return HttpResponse::BadRequest().body(e).map_into_right_body(),
            };
            registry.create(SessionKind::DuelWithBot, variant, 2, false).await
        }
        "random" => {
            let variant = match query.get("game_type").map(|s| parse_variant_numeric(s)).unwrap_or(Err("missing game_type query parameter".to_string())) {
                Ok(v) => v,
                Err(e) => return HttpResponse::BadRequest().body(e).map_into_right_body(),
            };
            registry.resolve_random(variant).await
        }
        literal => match ID::parse(literal) {
            Ok(id) => id,
            Err(e) => return HttpResponse::BadRequest().body(e.to_string()).map_into_right_body(),
        },
    };

    let mut channel = match registry.register(id, &token).await {
        Ok(channel) => channel,
        Err(e) => return HttpResponse::NotFound().body(e.to_string()).map_into_right_body(),
    };
    registry.mark_as_registered(id).await;

    let (response, mut session, mut stream) = match actix_ws::handle(&req, body) {
        Ok(parts) => parts,
        Err(e) => {
            return HttpResponse::InternalServerError()
                .body(e.to_string())
                .map_into_right_body()
        }
    };

    let registry: Arc<Registry> = registry.as_ref().clone();
    let reveal_cards = config.reveal_cards;
    let image_size = config.image_size;
    let image_noise = config.image_noise;
    let image_rotate = config.image_rotate;

    actix_web::rt::spawn(async move {
        use futures::StreamExt;
        if resolved_randomly {
            let message = Protocol::encode(&Event::UpdateCoordinatorId(id.to_string()), reveal_cards, |rank| {
                card_image::render(rank, image_size, image_noise, image_rotate)
            });
            if session.text(message.to_json()).await.is_err() {
                return;
            }
        }
        'bridge: loop {
            tokio::select! {
                biased;
                event = channel.recv() => match event {
                    Some(event) => {
                        let closing = matches!(event, Event::Close);
                        let message = Protocol::encode(&event, reveal_cards, |rank| {
                            card_image::render(rank, image_size, image_noise, image_rotate)
                        });
                        if session.text(message.to_json()).await.is_err() || closing {
                            break 'bridge;
                        }
                    }
                    None => break 'bridge,
                },
                frame = stream.next() => match frame {
                    Some(Ok(actix_ws::Message::Text(text))) => {
                        match Protocol::decode(text.as_ref()) {
                            Ok(intake) => { let _ = registry.submit(id, token.clone(), intake).await; }
                            Err(e) => log::debug!("ignoring malformed frame from {token}: {e}"),
                        }
                    }
                    Some(Ok(actix_ws::Message::Close(_))) | Some(Err(_)) | None => break 'bridge,
                    _ => continue 'bridge,
                },
            }
        }
        registry.mark_disconnected(id, &token).await;
        log::debug!("bridge closed for session {id} token {token}");
    });

    response.map_into_left_body()
}
