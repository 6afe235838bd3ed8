use std::io::Write;

use anyhow::Result;
use lexaid_agent::ChatClient;
use lexaid_core::{
    conversation::{ConversationStore, FileBackend},
    StreamEnd,
};
use lexaid_domains::consult::{Consultation, QUICK_PROMPTS};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::Ctx;
use crate::cli::ConsultArgs;

const HELP: &str = "输入问题后回车发送；数字 1-4 选择常见问题。
/retry 重新生成上一条回复  /clear 清空对话  /copy 输出对话全文  /quit 退出（或 Ctrl-D）
生成过程中按 Ctrl-C 停止。";

type Session = Consultation<FileBackend>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Turn<'a> {
    Ask(&'a str),
    Retry,
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Empty,
    Quit,
    Help,
    Clear,
    Copy,
    Chat(Turn<'a>),
}

/// `1`..`4` pick a quick prompt; anything else is sent as typed.
fn resolve_quick_prompt(input: &str) -> &str {
    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| QUICK_PROMPTS.get(i).copied())
        .unwrap_or(input)
}

fn parse_line(line: &str) -> Line<'_> {
    match line.trim() {
        "" => Line::Empty,
        "/quit" | "/exit" => Line::Quit,
        "/help" => Line::Help,
        "/clear" => Line::Clear,
        "/copy" => Line::Copy,
        "/retry" => Line::Chat(Turn::Retry),
        input => Line::Chat(Turn::Ask(resolve_quick_prompt(input))),
    }
}

/// Stream one reply to `out`. Ctrl-C during the stream cancels it.
async fn ask(
    client: &ChatClient,
    session: &mut Session,
    turn: Turn<'_>,
    out: &mut (dyn Write + Send),
) -> Result<StreamEnd> {
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let mut write_error = None;
    let mut on_delta = |delta: &str| {
        if let Err(e) = out.write_all(delta.as_bytes()).and_then(|()| out.flush()) {
            write_error.get_or_insert(e);
        }
    };
    let result = match turn {
        Turn::Ask(text) => session.send(client, text, &mut on_delta, &cancel).await,
        Turn::Retry => session.regenerate(client, &mut on_delta, &cancel).await,
    };
    watcher.abort();
    writeln!(out)?;

    if let Some(e) = write_error {
        warn!("failed to write reply: {e}");
    }
    let end = result?;
    match end {
        StreamEnd::Cancelled => writeln!(out, "（已停止生成）")?,
        StreamEnd::Eof => writeln!(out, "（连接提前结束，回复可能不完整）")?,
        StreamEnd::Done => {},
    }
    Ok(end)
}

pub async fn run(ctx: &Ctx, args: ConsultArgs, out: &mut (dyn Write + Send)) -> Result<()> {
    let store = ConversationStore::load(FileBackend::new(ctx.config.conversation_path()))?;
    let mut session = Consultation::new(store);
    if args.fresh {
        session.clear()?;
    }
    let client = ctx.client()?;

    if let Some(message) = args.message {
        ask(&client, &mut session, Turn::Ask(resolve_quick_prompt(&message)), out).await?;
        return Ok(());
    }

    let turns = session.store().messages().len();
    if turns > 0 {
        writeln!(out, "已恢复 {turns} 条历史消息。")?;
    }
    for (i, prompt) in QUICK_PROMPTS.iter().enumerate() {
        writeln!(out, "  {}. {prompt}", i + 1)?;
    }
    writeln!(out, "{HELP}")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_line(&line) {
            Line::Empty => {},
            Line::Quit => break,
            Line::Help => writeln!(out, "{HELP}")?,
            Line::Clear => {
                session.clear()?;
                writeln!(out, "（对话已清空）")?;
            },
            Line::Copy => writeln!(out, "{}", session.transcript())?,
            Line::Chat(turn) => {
                if let Err(e) = ask(&client, &mut session, turn, out).await {
                    eprintln!("咨询失败，请稍后重试：{e:#}");
                }
            },
        }
    }
    Ok(())
}
