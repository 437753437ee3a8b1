//! User account command handlers

use crate::models::{NewUser, UserChanges};
use crate::state::SharedState;

pub async fn cmd_user_create(
    state: &SharedState,
    name: String,
    email: String,
    password: String,
    admin: bool,
) -> anyhow::Result<()> {
    let user = state
        .user_service
        .create(NewUser {
            name,
            email,
            password,
            is_admin: admin,
        })
        .await?;

    let role = if user.is_admin { "admin" } else { "user" };
    println!("✓ Created {role} {} <{}> (ID: {})", user.name, user.email, user.id);
    Ok(())
}

pub async fn cmd_user_list(state: &SharedState) -> anyhow::Result<()> {
    let users = state.user_service.get_all().await?;

    if users.is_empty() {
        println!("No users yet.");
        println!();
        println!("Create one with: marquee user create --name <name> --email <email> --password <password> --admin");
        return Ok(());
    }

    println!("Users ({} total)", users.len());
    println!("{:-<70}", "");

    for user in users {
        let marker = if user.is_admin { "★" } else { "•" };
        println!("{marker} {} <{}>", user.name, user.email);
        println!("  ID: {} | Created: {}", user.id, user.created_at);
    }

    println!();
    println!("Legend: ★ Admin");

    Ok(())
}

pub async fn cmd_user_promote(state: &SharedState, email: &str) -> anyhow::Result<()> {
    let Some(user) = state.user_service.get_by_email(email).await? else {
        println!("No user with email {email}.");
        println!("Use 'marquee user list' to see accounts.");
        return Ok(());
    };

    if user.is_admin {
        println!("{} is already an admin.", user.email);
        return Ok(());
    }

    let user = state
        .user_service
        .update(
            user.id,
            UserChanges {
                is_admin: Some(true),
                ..UserChanges::default()
            },
        )
        .await?;

    println!("✓ {} is now an admin", user.email);
    Ok(())
}
