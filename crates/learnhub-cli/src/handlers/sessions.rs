#![deny(clippy::all, clippy::pedantic)]

use learnhub::endpoints::{SessionListFilter, SessionMutation, SessionQuery};
use learnhub::view::SessionFilter;
use learnhub_api_types::{MentoringSession, SessionCreateRequest, SessionStatus};
use serde_json::json;
use time::OffsetDateTime;

use crate::args::{SessionStatusArg, SessionsCmd};
use crate::client::{CliError, Ctx};
use crate::io::parse_time;
use crate::print::{print_json, print_lines};
use crate::render::session_lines;

pub async fn handle(ctx: &Ctx, cmd: SessionsCmd) -> Result<(), CliError> {
    let mutation = match cmd {
        SessionsCmd::List {
            status,
            search,
            timeframe,
            limit,
            cursor,
            human,
        } => {
            let local = SessionFilter {
                search,
                status: status.map(Into::into),
                timeframe,
            };
            let remote = SessionListFilter {
                status: local.status,
                cursor,
                limit,
            };
            return list(ctx, remote, &local, OffsetDateTime::now_utc(), human).await;
        }
        SessionsCmd::Open => return query(ctx, SessionQuery::Open).await,
        SessionsCmd::Created => return query(ctx, SessionQuery::Created).await,
        SessionsCmd::Get { session } => {
            return query(
                ctx,
                SessionQuery::Get {
                    session_id: session,
                },
            )
            .await;
        }
        SessionsCmd::Create {
            title,
            description,
            start,
            duration,
            max_participants,
            topics,
        } => SessionMutation::Create {
            body: SessionCreateRequest {
                title,
                description: description.unwrap_or_default(),
                start_time: parse_time(&start)?,
                duration_minutes: duration,
                max_participants,
                topics,
            },
        },
        SessionsCmd::Join { session } => SessionMutation::Join {
            session_id: session,
        },
        SessionsCmd::Cancel { session } => SessionMutation::Cancel {
            session_id: session,
        },
    };

    let res = ctx.client.mutate(mutation).await?;
    print_json(res.as_ref())
}

async fn query(ctx: &Ctx, query: SessionQuery) -> Result<(), CliError> {
    let res = ctx.client.query(query).await?;
    print_json(res.as_ref())
}

/// Server-side status and paging, then local search and timeframe.
pub(crate) async fn list(
    ctx: &Ctx,
    remote: SessionListFilter,
    local: &SessionFilter,
    now: OffsetDateTime,
    human: bool,
) -> Result<(), CliError> {
    let page = ctx
        .client
        .query_data::<Vec<MentoringSession>>(SessionQuery::List(remote))
        .await?;
    let sessions = page.data.as_deref().unwrap_or_default();
    let matching = local.apply(sessions, now);
    if human {
        return print_lines(&session_lines(&matching));
    }

    let mut out = json!({ "count": matching.len(), "data": matching });
    if let Some(cursor) = page.cursor() {
        out["hasMore"] = json!(cursor.has_more);
        out["nextCursor"] = json!(cursor.next_cursor);
    }
    print_json(&out)
}

impl From<SessionStatusArg> for SessionStatus {
    fn from(value: SessionStatusArg) -> Self {
        match value {
            SessionStatusArg::Scheduled => SessionStatus::Scheduled,
            SessionStatusArg::InProgress => SessionStatus::InProgress,
            SessionStatusArg::Completed => SessionStatus::Completed,
            SessionStatusArg::Cancelled => SessionStatus::Cancelled,
        }
    }
}
