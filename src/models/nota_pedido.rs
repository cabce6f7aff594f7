use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::{documento::LineaDetalle, fecha, Totals, TIPO_COMPRA};
use crate::filters::Record;

/// Purchase order lifecycle, in list order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoNP {
    PendAceptacion,
    PendEntrega,
    Cerrada,
    Rechazada,
}

impl EstadoNP {
    pub const ALL: [EstadoNP; 4] = [
        EstadoNP::PendAceptacion,
        EstadoNP::PendEntrega,
        EstadoNP::Cerrada,
        EstadoNP::Rechazada,
    ];

    pub fn position(self) -> usize {
        Self::ALL.iter().position(|e| *e == self).unwrap_or_default()
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, EstadoNP::Cerrada | EstadoNP::Rechazada)
    }

    /// States offered in the status menu: every later state in list order.
    /// Closed and rejected orders offer nothing.
    pub fn allowed_next_states(self) -> Vec<EstadoNP> {
        if self.is_terminal() {
            return Vec::new();
        }
        Self::ALL
            .iter()
            .copied()
            .filter(|e| e.position() > self.position())
            .collect()
    }

    pub fn can_move_to(self, next: EstadoNP) -> bool {
        self.allowed_next_states().contains(&next)
    }

    pub fn label(self) -> &'static str {
        match self {
            EstadoNP::PendAceptacion => "Pendiente de aceptación",
            EstadoNP::PendEntrega => "Pendiente de entrega",
            EstadoNP::Cerrada => "Cerrada",
            EstadoNP::Rechazada => "Rechazada",
        }
    }
}

impl fmt::Display for EstadoNP {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstadoNP::PendAceptacion => write!(f, "PEND_ACEPTACION"),
            EstadoNP::PendEntrega => write!(f, "PEND_ENTREGA"),
            EstadoNP::Cerrada => write!(f, "CERRADA"),
            EstadoNP::Rechazada => write!(f, "RECHAZADA"),
        }
    }
}

impl FromStr for EstadoNP {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PEND_ACEPTACION" => Ok(EstadoNP::PendAceptacion),
            "PEND_ENTREGA" => Ok(EstadoNP::PendEntrega),
            "CERRADA" => Ok(EstadoNP::Cerrada),
            "RECHAZADA" => Ok(EstadoNP::Rechazada),
            _ => Err(format!("Unknown purchase order status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("la nota de pedido {id} no puede pasar de {from} a {to}")]
pub struct InvalidTransition {
    pub id: i64,
    pub from: EstadoNP,
    pub to: EstadoNP,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotaPedido {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "fecha::option")]
    pub fecha: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "fecha::option")]
    pub vencimiento: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usuario_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proveedor_id: Option<i64>,
    pub estado: EstadoNP,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_compra: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detalle: Option<Vec<LineaDetalle>>,
}

impl NotaPedido {
    pub fn check_transition(&self, next: EstadoNP) -> Result<(), InvalidTransition> {
        if self.estado.can_move_to(next) {
            Ok(())
        } else {
            Err(InvalidTransition {
                id: self.id,
                from: self.estado,
                to: next,
            })
        }
    }

    pub fn totals(&self) -> Totals {
        Totals::compute(self.detalle.as_deref())
    }
}

impl Record for NotaPedido {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotaPedidoDisplay {
    pub id: i64,
    pub fecha: String,
    pub vencimiento: String,
    pub proveedor: String,
    pub estado: EstadoNP,
    pub estado_label: &'static str,
    pub siguientes: Vec<EstadoNP>,
    pub tipo_compra: &'static str,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub iva: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl NotaPedidoDisplay {
    pub fn new(nota: &NotaPedido, proveedor: Option<&str>) -> Self {
        let totals = nota.totals();
        Self {
            id: nota.id,
            fecha: fecha::display(nota.fecha),
            vencimiento: fecha::display(nota.vencimiento),
            proveedor: proveedor.unwrap_or_default().to_string(),
            estado: nota.estado,
            estado_label: nota.estado.label(),
            siguientes: nota.estado.allowed_next_states(),
            tipo_compra: TIPO_COMPRA.label_or_empty(nota.tipo_compra),
            subtotal: totals.subtotal,
            iva: totals.iva,
            total: totals.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nota(estado: EstadoNP) -> NotaPedido {
        serde_json::from_value(serde_json::json!({
            "id": 12,
            "fecha": "2024-04-10T00:00:00.000Z",
            "proveedor_id": 3,
            "estado": estado.to_string(),
        }))
        .unwrap()
    }

    #[test]
    fn test_allowed_next_states_from_each_state() {
        use EstadoNP::*;
        assert_eq!(PendAceptacion.allowed_next_states(), vec![PendEntrega, Cerrada, Rechazada]);
        assert_eq!(PendEntrega.allowed_next_states(), vec![Cerrada, Rechazada]);
        assert!(Cerrada.allowed_next_states().is_empty());
        assert!(Rechazada.allowed_next_states().is_empty());
    }

    #[test]
    fn test_no_backward_or_self_transition() {
        use EstadoNP::*;
        assert!(!PendEntrega.can_move_to(PendAceptacion));
        assert!(!PendEntrega.can_move_to(PendEntrega));
        assert!(!Rechazada.can_move_to(Cerrada));
    }

    #[test]
    fn test_check_transition_reports_both_states() {
        let err = nota(EstadoNP::Cerrada).check_transition(EstadoNP::Rechazada).unwrap_err();
        assert_eq!(err.from, EstadoNP::Cerrada);
        assert_eq!(err.to, EstadoNP::Rechazada);
        assert!(nota(EstadoNP::PendAceptacion).check_transition(EstadoNP::Rechazada).is_ok());
    }

    #[test]
    fn test_status_round_trips_by_name() {
        for estado in EstadoNP::ALL {
            assert_eq!(estado.to_string().parse::<EstadoNP>(), Ok(estado));
        }
        assert!("Cerrada".parse::<EstadoNP>().is_err());
    }

    #[test]
    fn test_missing_detail_shows_zero_totals() {
        let display = NotaPedidoDisplay::new(&nota(EstadoNP::PendEntrega), Some("Sinteplast"));
        assert_eq!(display.total, Decimal::ZERO);
        assert_eq!(display.fecha, "10/04/2024");
        assert_eq!(display.siguientes, vec![EstadoNP::Cerrada, EstadoNP::Rechazada]);
    }
}
