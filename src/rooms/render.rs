use crate::{
    include_res,
    model::{Question, Room, User},
    res::{attr, text},
    theme::Theme,
};

/// Empty for a room without questions.
pub fn question_count(room: &Room) -> String {
    match room.questions.len() {
        0 => String::new(),
        n => format!("<span>{n} question(s)</span>"),
    }
}

pub fn questions(room: &Room) -> String {
    room.questions
        .iter()
        .map(|question| render_question(room, question))
        .collect()
}

fn render_question(room: &Room, question: &Question) -> String {
    let mut class = String::from("question");
    if question.is_answered {
        class += " answered";
    } else if question.is_highlighted {
        class += " highlighted";
    }

    include_res!(str, "/pages/rooms/question.html")
        .replace("{class}", &class)
        .replace("{avatar}", &attr(&question.author.avatar))
        .replace("{like}", &like_control(room, question))
        .replace("{name}", &text(&question.author.name))
        .replace("{content}", &text(&question.content))
}

fn like_control(room: &Room, question: &Question) -> String {
    if question.is_answered {
        return String::new();
    }

    let count = match question.like_count {
        0 => String::new(),
        n => format!("<span>{n}</span>"),
    };
    let (class, like_id) = match &question.like_id {
        Some(like_id) => (
            "like liked",
            format!(r#"<input type="hidden" name="like_id" value="{}">"#, attr(like_id.as_str())),
        ),
        None => ("like", String::new()),
    };

    format!(
        r#"<form method="post" action="/rooms/{}/questions/{}/like">{like_id}<button type="submit" class="{class}" aria-label="Like">{count}&#128077;</button></form>"#,
        attr(room.code.as_str()),
        attr(question.id.as_str()),
    )
}

pub fn room_page(room: &Room, user: Option<&User>, theme: Theme) -> String {
    let here = format!("/rooms/{}", room.code);

    let (user_info, submit) = match user {
        Some(user) => (
            format!(
                r#"<div class="user-info"><img src="{}" alt="{}"><span>{}</span></div>"#,
                attr(&user.avatar),
                attr(&user.name),
                text(&user.name),
            ),
            "",
        ),
        None => (
            format!(
                r#"<span>To ask a question, <a href="/login?return_url={}">sign in</a>.</span>"#,
                attr(&here),
            ),
            "disabled",
        ),
    };

    include_res!(str, "/pages/rooms/room.html")
        .replace("{theme}", theme.class())
        .replace("{logo}", theme.logo())
        .replace("{toggle_label}", theme.toggle_label())
        .replace("{return_url}", &attr(&here))
        .replace("{submit}", submit)
        .replace("{room_code}", &attr(room.code.as_str()))
        .replace("{question_count}", &question_count(room))
        .replace("{user_info}", &user_info)
        .replace("{title}", &text(&room.title))
        .replace("{questions}", &questions(room))
}
