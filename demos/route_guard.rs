//! Walks a few principals through the built-in school catalog and prints
//! each guard decision and the menu every role ends up with.
//!
//! Run with: RUST_LOG=aula_rbac=debug cargo run --example route_guard

use aula_rbac::{AccessEngine, MenuItem, MenuSection, Principal, Role, filter_menu_by_role};
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let engine = AccessEngine::school()?;
    let version = engine.current_version();
    println!("catalog {} loaded at {}", &version.hash[..12], version.loaded_at);

    let visits = [
        (None, "/usuarios"),
        (Some(Principal::without_role()), "/"),
        (Some(Principal::new("conserje")), "/"),
        (Some(Principal::with_role(Role::Profesor)), "/usuarios"),
        (Some(Principal::with_role(Role::Profesor)), "/calificaciones"),
        (Some(Principal::with_role(Role::Alumno)), "/mis-calificaciones"),
        (Some(Principal::with_role(Role::Apoderado)), "/calificaciones"),
        (Some(Principal::with_role(Role::Secretaria)), "/alumnos/detalle/42"),
    ];

    println!("\n=== Guard decisions ===");
    for (principal, path) in &visits {
        let who = principal
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "<anonymous>".to_string());
        let decision = engine.evaluate(principal.as_ref(), path);
        println!("{who:>24} {path:<24} {decision}");
    }

    let menu = vec![
        MenuSection::new(
            "Inicio",
            vec![
                MenuItem::new("Panel", "/").with_icon("home"),
                MenuItem::new("Mis calificaciones", "/mis-calificaciones").with_icon("star"),
            ],
        ),
        MenuSection::new(
            "Gestión",
            vec![
                MenuItem::new("Usuarios", "/usuarios").with_icon("users"),
                MenuItem::new("Matrículas", "/matriculas"),
                MenuItem::new("Finanzas", "/finanzas").with_icon("wallet"),
            ],
        ),
        MenuSection::new(
            "Académico",
            vec![
                MenuItem::new("Cursos", "/cursos"),
                MenuItem::new("Calificaciones", "/calificaciones"),
                MenuItem::new("Asistencia", "/asistencia"),
                MenuItem::new("Comunicados", "/comunicados"),
            ],
        ),
    ];

    let catalog = engine.catalog();
    println!("\n=== Menus ===");
    for role in Role::iter() {
        println!("{role} (lands on {})", catalog.default_route(&role));
        for section in filter_menu_by_role(&menu, &role, &catalog) {
            let labels: Vec<&str> = section.items.iter().map(|i| i.label.as_str()).collect();
            println!("  {}: {}", section.title, labels.join(", "));
        }
    }

    Ok(())
}
