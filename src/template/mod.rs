//! Canned components used when no remote provider produced one.

use crate::wire::Artifact;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Vehicle,
    Button,
    Card,
    Navbar,
}

impl ComponentKind {
    /// Category used when a prompt names none of the known ones.
    pub const DEFAULT: ComponentKind = ComponentKind::Button;

    /// Matching order for `select`: first category with a hit wins.
    const PRIORITY: [(ComponentKind, &'static [&'static str]); 4] = [
        (ComponentKind::Vehicle, &["car", "vehicle", "automobile"]),
        (ComponentKind::Button, &["button", "btn"]),
        (ComponentKind::Card, &["card", "container", "box"]),
        (ComponentKind::Navbar, &["nav", "header", "menu", "navigation"]),
    ];

    /// Pick the category a prompt asks for. Case-insensitive substring match,
    /// so "card" also hits the vehicle term "car" first.
    pub fn select(prompt: &str) -> ComponentKind {
        let p = prompt.to_lowercase();
        Self::PRIORITY
            .iter()
            .find(|(_, terms)| terms.iter().any(|t| p.contains(t)))
            .map(|(kind, _)| *kind)
            .unwrap_or(Self::DEFAULT)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Vehicle => "vehicle",
            ComponentKind::Button => "button",
            ComponentKind::Card => "card",
            ComponentKind::Navbar => "navbar",
        }
    }

    pub fn template(&self) -> Artifact {
        let (markup, stylesheet) = match self {
            ComponentKind::Vehicle => (CAR_MARKUP, CAR_STYLESHEET),
            ComponentKind::Button => (BUTTON_MARKUP, BUTTON_STYLESHEET),
            ComponentKind::Card => (CARD_MARKUP, CARD_STYLESHEET),
            ComponentKind::Navbar => (NAVBAR_MARKUP, NAVBAR_STYLESHEET),
        };
        Artifact::new(markup, stylesheet)
    }
}

/// Template for whatever category `prompt` names.
pub fn for_prompt(prompt: &str) -> (ComponentKind, Artifact) {
    let kind = ComponentKind::select(prompt);
    (kind, kind.template())
}

const BUTTON_MARKUP: &str = r#"import React from 'react';

const Button = ({ children, onClick, variant = 'primary' }) => {
  return (
    <button
      className={`btn btn-${variant}`}
      onClick={onClick}
    >
      {children}
    </button>
  );
};

export default Button;"#;

const BUTTON_STYLESHEET: &str = r#".btn {
  padding: 12px 24px;
  border: none;
  border-radius: 6px;
  font-size: 16px;
  font-weight: 500;
  cursor: pointer;
  transition: all 0.2s ease;
}

.btn-primary {
  background-color: #3b82f6;
  color: white;
}

.btn-primary:hover {
  background-color: #2563eb;
  transform: translateY(-1px);
}

.btn-secondary {
  background-color: #6b7280;
  color: white;
}

.btn-secondary:hover {
  background-color: #4b5563;
}

.btn-success {
  background-color: #10b981;
  color: white;
}

.btn-success:hover {
  background-color: #059669;
}"#;

const CAR_MARKUP: &str = r#"import React from 'react';

const Car = ({ model, color = 'red', speed = 'fast' }) => {
  return (
    <div className="car">
      <div className="car-body">
        <div className="car-top"></div>
        <div className="car-bottom">
          <div className="car-wheel car-wheel-front"></div>
          <div className="car-wheel car-wheel-back"></div>
        </div>
      </div>
      <div className="car-details">
        <h3 className="car-model">{model || 'Sports Car'}</h3>
        <p className="car-specs">Color: {color} | Speed: {speed}</p>
      </div>
    </div>
  );
};

export default Car;"#;

const CAR_STYLESHEET: &str = r#".car {
  display: flex;
  flex-direction: column;
  align-items: center;
  gap: 20px;
  padding: 20px;
}

.car-body {
  position: relative;
  width: 200px;
  height: 80px;
  background: linear-gradient(45deg, #ff4444, #cc0000);
  border-radius: 40px 40px 20px 20px;
  box-shadow: 0 8px 16px rgba(0,0,0,0.3);
}

.car-top {
  position: absolute;
  top: -20px;
  left: 50%;
  transform: translateX(-50%);
  width: 120px;
  height: 40px;
  background: linear-gradient(45deg, #ff6666, #ff4444);
  border-radius: 20px 20px 0 0;
  border: 2px solid #cc0000;
}

.car-bottom {
  position: relative;
  width: 100%;
  height: 100%;
}

.car-wheel {
  position: absolute;
  bottom: -15px;
  width: 30px;
  height: 30px;
  background: #333;
  border-radius: 50%;
  border: 3px solid #666;
  box-shadow: inset 0 0 8px rgba(0,0,0,0.5);
}

.car-wheel-front {
  left: 20px;
}

.car-wheel-back {
  right: 20px;
}

.car-details {
  text-align: center;
}

.car-model {
  margin: 0 0 8px 0;
  font-size: 18px;
  font-weight: bold;
  color: #333;
}

.car-specs {
  margin: 0;
  font-size: 14px;
  color: #666;
}

/* Car variants */
.car.sports {
  transform: scale(1.1);
}

.car.luxury .car-body {
  background: linear-gradient(45deg, #b8860b, #ffd700);
}

.car.electric .car-body {
  background: linear-gradient(45deg, #00ff00, #00cc00);
}"#;

const CARD_MARKUP: &str = r#"import React from 'react';

const Card = ({ title, content, image }) => {
  return (
    <div className="card">
      {image && (
        <div className="card-image">
          <img src={image} alt={title} />
        </div>
      )}
      <div className="card-content">
        <h3 className="card-title">{title}</h3>
        <p className="card-text">{content}</p>
      </div>
    </div>
  );
};

export default Card;"#;

const CARD_STYLESHEET: &str = r#".card {
  background: white;
  border-radius: 12px;
  box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1);
  overflow: hidden;
  transition: transform 0.2s ease, box-shadow 0.2s ease;
}

.card:hover {
  transform: translateY(-4px);
  box-shadow: 0 8px 25px rgba(0, 0, 0, 0.15);
}

.card-image {
  width: 100%;
  height: 200px;
  overflow: hidden;
}

.card-image img {
  width: 100%;
  height: 100%;
  object-fit: cover;
}

.card-content {
  padding: 20px;
}

.card-title {
  margin: 0 0 12px 0;
  font-size: 20px;
  font-weight: 600;
  color: #1f2937;
}

.card-text {
  margin: 0;
  color: #6b7280;
  line-height: 1.6;
}"#;

const NAVBAR_MARKUP: &str = r#"import React, { useState } from 'react';

const Navbar = ({ brand, links }) => {
  const [isOpen, setIsOpen] = useState(false);

  return (
    <nav className="navbar">
      <div className="navbar-brand">
        <span className="navbar-logo">{brand}</span>
        <button
          className="navbar-toggle"
          onClick={() => setIsOpen(!isOpen)}
        >
          <span></span>
          <span></span>
          <span></span>
        </button>
      </div>

      <div className={`navbar-menu ${isOpen ? 'is-open' : ''}`}>
        {links.map((link, index) => (
          <a key={index} href={link.url} className="navbar-link">
            {link.text}
          </a>
        ))}
      </div>
    </nav>
  );
};

export default Navbar;"#;

const NAVBAR_STYLESHEET: &str = r#".navbar {
  background: white;
  padding: 1rem 2rem;
  box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1);
  display: flex;
  justify-content: space-between;
  align-items: center;
}

.navbar-brand {
  display: flex;
  align-items: center;
  gap: 1rem;
}

.navbar-logo {
  font-size: 1.5rem;
  font-weight: bold;
  color: #3b82f6;
}

.navbar-toggle {
  display: none;
  flex-direction: column;
  background: none;
  border: none;
  cursor: pointer;
  padding: 4px;
}

.navbar-toggle span {
  width: 25px;
  height: 3px;
  background: #374151;
  margin: 2px 0;
  transition: 0.3s;
}

.navbar-menu {
  display: flex;
  gap: 2rem;
  align-items: center;
}

.navbar-link {
  text-decoration: none;
  color: #374151;
  font-weight: 500;
  transition: color 0.2s ease;
}

.navbar-link:hover {
  color: #3b82f6;
}

@media (max-width: 768px) {
  .navbar-toggle {
    display: flex;
  }

  .navbar-menu {
    display: none;
    position: absolute;
    top: 100%;
    left: 0;
    right: 0;
    background: white;
    flex-direction: column;
    padding: 1rem;
    box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1);
  }

  .navbar-menu.is-open {
    display: flex;
  }
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order_is_vehicle_button_card_nav() {
        assert_eq!(ComponentKind::select("a vehicle with a button"), ComponentKind::Vehicle);
        assert_eq!(ComponentKind::select("a button in a box"), ComponentKind::Button);
        assert_eq!(ComponentKind::select("a box with a menu"), ComponentKind::Card);
        assert_eq!(ComponentKind::select("site header"), ComponentKind::Navbar);
    }

    #[test]
    fn unknown_category_defaults_to_button() {
        assert_eq!(ComponentKind::select("something shiny"), ComponentKind::Button);
        assert_eq!(ComponentKind::DEFAULT, ComponentKind::Button);
    }

    #[test]
    fn card_prompt_hits_car_substring_first() {
        assert_eq!(ComponentKind::select("create a card"), ComponentKind::Vehicle);
        assert_eq!(ComponentKind::select("create a container"), ComponentKind::Card);
    }

    #[test]
    fn selection_is_case_insensitive() {
        assert_eq!(ComponentKind::select("NAVIGATION bar"), ComponentKind::Navbar);
        assert_eq!(ComponentKind::select("Big BTN"), ComponentKind::Button);
    }

    #[test]
    fn same_prompt_yields_same_template() {
        let (k1, a1) = for_prompt("make me a header");
        let (k2, a2) = for_prompt("make me a header");
        assert_eq!(k1, k2);
        assert_eq!(a1, a2);
        assert!(a1.markup.contains("const Navbar"));
    }

    #[test]
    fn every_template_is_complete() {
        for kind in [ComponentKind::Vehicle, ComponentKind::Button, ComponentKind::Card, ComponentKind::Navbar] {
            let a = kind.template();
            assert!(a.is_complete(), "{} template incomplete", kind.as_str());
        }
    }
}
