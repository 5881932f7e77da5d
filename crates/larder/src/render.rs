//! Terminal rendering of items and notices.

use colored::Colorize;

use larder_core::{ItemView, Notice};

/// Print the whole list, numbered from 1.
pub fn print_list(items: &[ItemView]) {
    if items.is_empty() {
        println!("{}", "(no items)".dimmed());
        return;
    }
    for (index, view) in items.iter().enumerate() {
        print_item(index + 1, view);
    }
}

pub fn print_item(number: usize, view: &ItemView) {
    let marker = if view.editing {
        format!(" {}", "[editing]".yellow())
    } else {
        String::new()
    };
    println!("{:>3}. {}{}", number, view.name.bold(), marker);

    if let Some(suggestion) = view.shown_suggestion() {
        println!("     {} {}", "→".green(), suggestion.alternative.green());
        if !suggestion.reason.is_empty() {
            println!("       {}", suggestion.reason.dimmed());
        }
    } else if view.suggestion_pending {
        println!("     {}", "… fetching suggestion".dimmed());
    }

    if let Some(image) = &view.image {
        println!("     {} {}", "▣".cyan(), image.as_str().cyan());
    } else if view.image_pending {
        println!("     {}", "… fetching image".dimmed());
    }
}

pub fn print_notice(notice: &Notice) {
    eprintln!("{} {}", "✗".red(), notice.to_string().yellow());
}
