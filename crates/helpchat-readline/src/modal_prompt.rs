//! Interactive forms for the widget's modal slot.
//!
//! Each field is read with the current value prefilled. `:cancel`, Ctrl-C
//! or Ctrl-D closes the modal without sending anything.

use anyhow::Result;
use colored::Colorize;
use helpchat_application::{ChatWidget, DispatchOutcome};
use helpchat_core::modal::{
    ActiveModal, TicketFilterModal, TicketFormModal, TicketFormStage, TicketStatus,
};
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;

use crate::helper::CliHelper;
use crate::render::Transcript;
use crate::typing;

pub type ChatEditor = Editor<CliHelper, DefaultHistory>;

const CANCEL: &str = ":cancel";

/// Answer to one field prompt.
enum Field {
    Value(String),
    Cancel,
}

fn ask(rl: &mut ChatEditor, label: &str, current: &str) -> Result<Field> {
    match rl.readline_with_initial(&format!("  {}: ", label), (current, "")) {
        Ok(line) if line.trim() == CANCEL => Ok(Field::Cancel),
        Ok(line) => Ok(Field::Value(line.trim().to_string())),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(Field::Cancel),
        Err(err) => Err(err.into()),
    }
}

/// Drives the open modal until it is submitted or cancelled.
///
/// Returns the outcome of the submission, or `None` when cancelled.
pub async fn run(
    widget: &mut ChatWidget,
    rl: &mut ChatEditor,
    transcript: &mut Transcript,
) -> Result<Option<DispatchOutcome>> {
    while let Some(modal) = widget.active_modal().cloned() {
        println!("{}", format!("--- {} ---", modal.title()).bright_yellow().bold());
        println!("{}", format!("  ({} to close)", CANCEL).bright_black());

        let completed = match modal {
            ActiveModal::TicketFilter(_) => match pick_status(rl)? {
                Some(status) => {
                    let flag = widget.loading_flag();
                    let sent = typing::while_waiting(flag, widget.choose_ticket_status(status));
                    return Ok(Some(sent.await));
                }
                None => false,
            },
            ActiveModal::TicketId(mut form) => match ask(rl, "Ticket ID", &form.input)? {
                Field::Value(input) => {
                    form.input = input;
                    store(widget, ActiveModal::TicketId(form));
                    true
                }
                Field::Cancel => false,
            },
            ActiveModal::Search(mut form) => {
                match ask(rl, form.kind.placeholder(), &form.query)? {
                    Field::Value(query) => {
                        form.query = query;
                        store(widget, ActiveModal::Search(form));
                        true
                    }
                    Field::Cancel => false,
                }
            }
            ActiveModal::StockUpdate(mut form) => {
                let product = ask(rl, "Product ID", &form.product_id)?;
                let quantity = match product {
                    Field::Value(_) => ask(rl, "New quantity", &form.quantity)?,
                    Field::Cancel => Field::Cancel,
                };
                match (product, quantity) {
                    (Field::Value(product_id), Field::Value(quantity)) => {
                        form.product_id = product_id;
                        form.quantity = quantity;
                        store(widget, ActiveModal::StockUpdate(form));
                        true
                    }
                    _ => false,
                }
            }
            ActiveModal::TicketForm(form) if form.stage == TicketFormStage::Edit => {
                let Some(edited) = edit_ticket(rl, form)? else {
                    widget.cancel_modal();
                    return Ok(None);
                };
                store(widget, ActiveModal::TicketForm(edited));
                // An incomplete form appends a warning and stays in Edit.
                let _ = widget.confirm_ticket_form();
                transcript.flush(widget);
                continue;
            }
            ActiveModal::TicketForm(form) => {
                println!("  Title:       {}", form.title);
                println!("  Description: {}", form.description);
                println!("  Priority:    {}", form.priority);
                match ask(rl, "Submit this ticket? (yes/back)", "")? {
                    Field::Value(answer) if answer.eq_ignore_ascii_case("back") => {
                        if let Some(ActiveModal::TicketForm(open)) = widget.active_modal_mut() {
                            open.back();
                        }
                        continue;
                    }
                    Field::Value(answer) if answer.to_ascii_lowercase().starts_with('y') => true,
                    _ => false,
                }
            }
        };

        if !completed {
            widget.cancel_modal();
            println!("{}", "Cancelled.".bright_black());
            return Ok(None);
        }

        let outcome = typing::while_waiting(widget.loading_flag(), widget.submit_modal()).await;
        if let DispatchOutcome::Rejected(_) = outcome {
            // The modal stays open with a warning; show it and ask again.
            transcript.flush(widget);
            continue;
        }
        return Ok(Some(outcome));
    }
    Ok(None)
}

fn store(widget: &mut ChatWidget, modal: ActiveModal) {
    if let Some(slot) = widget.active_modal_mut() {
        *slot = modal;
    }
}

fn pick_status(rl: &mut ChatEditor) -> Result<Option<TicketStatus>> {
    for status in TicketFilterModal::statuses() {
        println!("  {} {}", format!("{})", status.id()).bright_black(), status.label());
    }
    loop {
        match ask(rl, "Status", "")? {
            Field::Value(choice) => {
                if let Some(status) = choice.parse().ok().and_then(TicketStatus::from_id) {
                    return Ok(Some(status));
                }
                println!("{}", format!("No status '{}'.", choice).red());
            }
            Field::Cancel => return Ok(None),
        }
    }
}

fn edit_ticket(
    rl: &mut ChatEditor,
    mut form: TicketFormModal,
) -> Result<Option<TicketFormModal>> {
    let Field::Value(title) = ask(rl, "Title", &form.title)? else {
        return Ok(None);
    };
    let Field::Value(description) = ask(rl, "Description", &form.description)? else {
        return Ok(None);
    };
    let label = format!("Priority ({})", form.priorities.join("/"));
    let Field::Value(priority) = ask(rl, &label, &form.priority)? else {
        return Ok(None);
    };
    form.title = title;
    form.description = description;
    form.priority = priority;
    Ok(Some(form))
}
