//! Serenity builders for profile cards.
use crate::interactions::ids::USERINFO_SELECT;
use crate::profile::{PagePayload, SelectorState};
use crate::ui::style::SELECT_PLACEHOLDER;
use serenity::builder::{
    CreateActionRow, CreateEmbed, CreateEmbedFooter, CreateSelectMenu, CreateSelectMenuKind,
    CreateSelectMenuOption,
};
use serenity::model::channel::ReactionType;

pub fn page_embed(payload: &PagePayload) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(payload.title.clone())
        .color(payload.colour);
    if let Some(description) = &payload.description {
        embed = embed.description(description.clone());
    }
    if let Some(url) = &payload.thumbnail {
        embed = embed.thumbnail(url.clone());
    }
    if let Some(url) = &payload.image {
        embed = embed.image(url.clone());
    }
    embed = embed.fields(
        payload
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.value.clone(), f.inline)),
    );
    if let Some(footer) = &payload.footer {
        embed = embed.footer(CreateEmbedFooter::new(footer.clone()));
    }
    embed
}

/// Single-choice page selector. The rendered page is marked as the default option.
pub fn page_selector(selector: &SelectorState) -> Vec<CreateActionRow> {
    let options = selector
        .options
        .iter()
        .map(|opt| {
            CreateSelectMenuOption::new(opt.label, opt.id.value())
                .description(opt.description)
                .emoji(ReactionType::Unicode(opt.icon.to_string()))
                .default_selection(opt.id == selector.selected)
        })
        .collect();
    let menu = CreateSelectMenu::new(USERINFO_SELECT, CreateSelectMenuKind::String { options })
        .placeholder(SELECT_PLACEHOLDER)
        .min_values(1)
        .max_values(1)
        .disabled(selector.disabled);
    vec![CreateActionRow::SelectMenu(menu)]
}
