use crate::contact::ContactDraft;
use crate::dom::{
    apply_palette, apply_theme, apply_theme_with_transition, install_effects, start_typewriter,
    LocalStorageStore,
};
use crate::logging::{log_event, set_threshold, LogLevel};
use crate::palette::{Palette, DEFAULT_PALETTE, PALETTES};
use crate::site::SiteConfig;
use crate::theme::ThemeState;
use gloo::events::EventListener;
use serde_json::json;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{window, HtmlInputElement, HtmlTextAreaElement, Node, SubmitEvent};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
struct TypewriterTextProps {
    words: Rc<Vec<String>>,
}

#[function_component(TypewriterText)]
fn typewriter_text(props: &TypewriterTextProps) -> Html {
    let text = use_state(String::new);

    {
        let text = text.clone();
        use_effect_with(props.words.clone(), move |words| {
            let handle = start_typewriter(words, move |next| text.set(next));
            move || drop(handle)
        });
    }

    html! {
        <span id="typewriter" class="typewriter" aria-live="polite">{(*text).clone()}</span>
    }
}

#[function_component(PalettePicker)]
fn palette_picker() -> Html {
    let open = use_state_eq(|| false);
    let current = use_state(|| DEFAULT_PALETTE.name);
    let toggle_ref = use_node_ref();
    let options_ref = use_node_ref();

    {
        let open = open.clone();
        let toggle_ref = toggle_ref.clone();
        let options_ref = options_ref.clone();
        use_effect_with((), move |_| {
            let listener = window().and_then(|w| w.document()).map(|document| {
                EventListener::new(&document, "click", move |event| {
                    let target = event
                        .target()
                        .and_then(|target| target.dyn_into::<Node>().ok());
                    let contains = |node_ref: &NodeRef| {
                        node_ref
                            .get()
                            .map(|node| node.contains(target.as_ref()))
                            .unwrap_or(false)
                    };

                    if !contains(&options_ref) && !contains(&toggle_ref) {
                        open.set(false);
                    }
                })
            });
            move || drop(listener)
        });
    }

    let on_toggle = {
        let open = open.clone();
        Callback::from(move |_| open.set(!*open))
    };

    let options = PALETTES.iter().map(|palette| {
        let name = palette.name;
        let onclick = {
            let open = open.clone();
            let current = current.clone();
            Callback::from(move |_| {
                apply_palette(&Palette::resolve(Some(name)));
                current.set(name);
                open.set(false);
            })
        };

        html! {
            <li>
                <button
                    class="palette-option"
                    type="button"
                    data-palette={name}
                    aria-pressed={(*current == name).to_string()}
                    style={format!("--swatch: {}", palette.accent)}
                    onclick={onclick}
                >
                    {palette.label}
                </button>
            </li>
        }
    });

    html! {
        <div class="palette-switcher">
            <button
                id="palette-toggle"
                class="palette-toggle"
                type="button"
                aria-label="Choose colour palette"
                aria-expanded={(*open).to_string()}
                ref={toggle_ref}
                onclick={on_toggle}
            >
                {"🎨"}
            </button>
            <ul
                id="palette-options"
                class={classes!("palette-options", (*open).then_some("show"))}
                ref={options_ref}
            >
                { for options }
            </ul>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ContactFormProps {
    recipient: AttrValue,
}

#[function_component(ContactForm)]
fn contact_form(props: &ContactFormProps) -> Html {
    let name_ref = use_node_ref();
    let email_ref = use_node_ref();
    let message_ref = use_node_ref();

    let onsubmit = {
        let recipient = props.recipient.clone();
        let (name_ref, email_ref, message_ref) =
            (name_ref.clone(), email_ref.clone(), message_ref.clone());
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();

            let field = |node_ref: &NodeRef| {
                node_ref
                    .cast::<HtmlInputElement>()
                    .map(|input| input.value())
                    .unwrap_or_default()
            };
            let message = message_ref
                .cast::<HtmlTextAreaElement>()
                .map(|area| area.value())
                .unwrap_or_default();

            let draft = ContactDraft::new(&field(&name_ref), &field(&email_ref), &message);
            let href = draft.mailto_href(&recipient);
            if let Some(win) = window() {
                if win.location().set_href(&href).is_err() {
                    log_event(LogLevel::Warn, "mailto_navigation_failed", json!({}));
                }
            }
        })
    };

    html! {
        <form id="contact-form" class="contact-form" onsubmit={onsubmit}>
            <label for="name">{"Name"}</label>
            <input id="name" name="name" type="text" required=true ref={name_ref} />
            <label for="email">{"Email"}</label>
            <input id="email" name="email" type="email" required=true ref={email_ref} />
            <label for="message">{"Message"}</label>
            <textarea id="message" name="message" rows="5" required=true ref={message_ref} />
            <button class="btn" type="submit">{"Send message"}</button>
        </form>
    }
}

#[derive(Properties, PartialEq)]
struct AppProps {
    site: Rc<SiteConfig>,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let site = &props.site;
    let theme = use_state(|| ThemeState::load(&LocalStorageStore));
    let roles = use_memo(site.clone(), |site| site.roles.clone());

    {
        let current = theme.current();
        use_effect_with((), move |_| {
            apply_theme(current);
            let effects = install_effects();
            move || drop(effects)
        });
    }

    let on_toggle = {
        let theme = theme.clone();
        Callback::from(move |_| {
            let mut next = *theme;
            let applied = next.toggle(&LocalStorageStore);
            apply_theme_with_transition(applied);
            log_event(
                LogLevel::Debug,
                "theme_toggled",
                json!({ "theme": applied.as_str() }),
            );
            theme.set(next);
        })
    };

    let skills = site.skills.iter().map(|skill| {
        html! {
            <div class="skill">
                <div class="skill-header">
                    <span>{skill.name.clone()}</span>
                    <span class="muted">{format!("{}%", skill.percent)}</span>
                </div>
                <div class="progress-track">
                    <div class="progress-value" data-percent={skill.percent.to_string()}></div>
                </div>
            </div>
        }
    });

    let projects = site.projects.iter().map(|project| {
        html! {
            <article class="project-card">
                <h3>{project.title.clone()}</h3>
                <p>{project.description.clone()}</p>
                <a class="btn btn-outline" href={project.href.clone()} target="_blank" rel="noopener noreferrer">
                    {"View project"}
                </a>
            </article>
        }
    });

    let stats = site.stats.iter().map(|stat| {
        html! {
            <div class="stat">
                <span
                    class="stat-number"
                    data-target={stat.target.to_string()}
                    data-multiplier={stat.multiplier.map(|value| value.to_string())}
                    data-suffix={stat.suffix.clone()}
                >
                    {"0"}
                </span>
                <span class="stat-label">{stat.label.clone()}</span>
            </div>
        }
    });

    html! {
        <>
            <div id="progress-bar" class="scroll-progress"></div>
            <header class="site-header">
                <nav class="navbar" aria-label="Primary">
                    <a class="logo" href="#hero">{site.owner_name.clone()}</a>
                    <ul id="nav-links" class="nav-links">
                        <li><a href="#about">{"About"}</a></li>
                        <li><a href="#skills">{"Skills"}</a></li>
                        <li><a href="#projects">{"Projects"}</a></li>
                        <li><a href="#stats">{"Impact"}</a></li>
                        <li><a href="#contact">{"Contact"}</a></li>
                    </ul>
                    <button
                        id="theme-toggle"
                        class="theme-toggle"
                        type="button"
                        aria-label={theme.current().toggle_label()}
                        onclick={on_toggle}
                    >
                        <span id="theme-icon" aria-hidden="true">{theme.icon()}</span>
                    </button>
                    <PalettePicker />
                </nav>
            </header>

            <section id="hero" class="hero">
                <div class="hero-content">
                    <h1>{format!("Hi, I'm {}", site.owner_name)}</h1>
                    <p class="hero-role">{"I am a "}<TypewriterText words={roles} /></p>
                    <p class="hero-tagline">{site.tagline.clone()}</p>
                    <div class="hero-actions">
                        <a class="btn" href="#contact">{"Get in touch"}</a>
                        <a class="btn btn-outline" href="#projects">{"See my work"}</a>
                    </div>
                </div>
                <div class="hero-image">
                    <img src="assets/profile.png" alt={site.owner_name.clone()} loading="lazy" />
                </div>
            </section>

            <main id="content">
                <section id="about" class="section hidden">
                    <h2>{"About"}</h2>
                    { for site.about.iter().map(|paragraph| html! { <p>{paragraph.clone()}</p> }) }
                </section>

                <section id="skills" class="section hidden">
                    <h2>{"Skills"}</h2>
                    { for skills }
                </section>

                <section id="projects" class="section hidden">
                    <h2>{"Projects"}</h2>
                    <div class="project-grid">{ for projects }</div>
                </section>

                <section id="contact" class="section hidden">
                    <h2>{"Contact"}</h2>
                    <ContactForm recipient={site.contact_email.clone()} />
                </section>
            </main>

            <section id="stats" class="stats hidden">
                { for stats }
            </section>

            <footer class="site-footer">
                <p class="muted">{format!("© {}", site.owner_name)}</p>
            </footer>
        </>
    }
}

pub fn run() {
    let site = SiteConfig::embedded();
    set_threshold(site.log_level());

    let Some(root) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("app"))
    else {
        log_event(LogLevel::Warn, "mount_point_missing", json!({ "id": "app" }));
        return;
    };

    yew::Renderer::<App>::with_root_and_props(root, AppProps { site: Rc::new(site) }).render();
}
