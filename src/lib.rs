//! Expense Desk - desktop client for the expense reporting backend.
//!
//! The library holds the client-side logic (approval rule builder, expense
//! draft, currency display, API client, local storage). The Tauri shell and
//! its IPC commands are compiled with the `desktop` feature.

#[cfg(feature = "desktop")]
pub mod commands;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

#[cfg(feature = "desktop")]
use commands::{
    add_draft_line, add_rule_approver, approve_expense, assign_rule, create_user,
    get_expense_draft, get_rule_builder, get_session, get_settings, list_currencies,
    list_expenses, list_managers, list_pending_approvals, list_rules, list_users, login, logout,
    move_rule_approver, open_rule_builder, reject_expense, remove_draft_line,
    remove_rule_approver, reset_expense_draft, reset_rule_builder, set_rule_details,
    set_rule_percentage, signup, submit_expense, submit_rule, update_settings, SessionState,
};
#[cfg(feature = "desktop")]
use tauri::Manager;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let result = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_store::Builder::new().build())
        .setup(|app| {
            let app_data_dir = app.path().app_data_dir()?;
            let db_path = db::get_db_path(&app_data_dir);

            let pool = tauri::async_runtime::block_on(db::initialize(&db_path))?;

            app.manage(pool);
            app.manage(SessionState::default());
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            signup,
            login,
            logout,
            get_session,
            list_users,
            list_managers,
            create_user,
            open_rule_builder,
            get_rule_builder,
            set_rule_details,
            set_rule_percentage,
            add_rule_approver,
            remove_rule_approver,
            move_rule_approver,
            reset_rule_builder,
            submit_rule,
            list_rules,
            assign_rule,
            get_expense_draft,
            add_draft_line,
            remove_draft_line,
            reset_expense_draft,
            submit_expense,
            list_expenses,
            list_pending_approvals,
            approve_expense,
            reject_expense,
            list_currencies,
            get_settings,
            update_settings,
        ])
        .run(tauri::generate_context!());

    if let Err(e) = result {
        log::error!("Error while running the application: {}", e);
        std::process::exit(1);
    }
}
