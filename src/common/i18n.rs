// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "es";

// (chave, es, pt, en)
const CATALOG: &[(&str, &str, &str, &str)] = &[
    // --- Erros ---
    ("error.validation",
        "Uno o más campos son inválidos.",
        "Um ou mais campos são inválidos.",
        "One or more fields are invalid."),
    ("error.session_expired",
        "Sesión expirada. Por favor, inicia sesión nuevamente.",
        "Sessão expirada. Por favor, faça login novamente.",
        "Session expired. Please sign in again."),
    ("error.forbidden",
        "No tienes acceso a esta sección.",
        "Você não tem acesso a esta área.",
        "You do not have access to this section."),
    ("error.action_not_allowed",
        "La acción {action} no está permitida en el estado {state}.",
        "A ação {action} não é permitida no estado {state}.",
        "Action {action} is not allowed in state {state}."),
    ("error.not_found",
        "No se encontró {resource} {id}.",
        "{resource} {id} não encontrado.",
        "{resource} {id} was not found."),
    ("error.partial_quote",
        "La solicitud {id} fue aceptada pero no se guardó la cotización. Corrígela desde Solicitudes de Trabajo.",
        "A solicitação {id} foi aceita mas a cotação não foi salva. Corrija em Solicitações de Trabalho.",
        "Request {id} was accepted but the quote was not saved. Fix it from Work Requests."),
    ("error.password_mismatch",
        "Las contraseñas no coinciden.",
        "As senhas não coincidem.",
        "Passwords do not match."),
    ("error.confirmation_required",
        "Debe ingresar la contraseña y confirmar para eliminar.",
        "Informe a senha e confirme para excluir.",
        "Enter your password and confirm to delete."),
    ("error.nothing_to_update",
        "No hay cambios para guardar.",
        "Não há alterações para salvar.",
        "There are no changes to save."),
    ("error.invalid_page_size",
        "Cantidad de filas inválida: {size}. Use 5, 10 o 15.",
        "Quantidade de linhas inválida: {size}. Use 5, 10 ou 15.",
        "Invalid page size: {size}. Use 5, 10 or 15."),
    ("error.backend",
        "El servidor no pudo procesar la solicitud.",
        "O servidor não conseguiu processar a requisição.",
        "The server could not process the request."),
    ("error.backend_unavailable",
        "No se pudo contactar al servidor. Inténtalo de nuevo más tarde.",
        "Não foi possível contatar o servidor. Tente novamente mais tarde.",
        "Could not reach the server. Try again later."),
    ("error.internal",
        "Ocurrió un error inesperado.",
        "Ocorreu um erro inesperado.",
        "An unexpected error occurred."),

    // --- Mensagens de sucesso (flash) ---
    ("flash.request.created",
        "Solicitud creada exitosamente.",
        "Solicitação criada com sucesso.",
        "Request created successfully."),
    ("flash.request.updated",
        "Descripción actualizada exitosamente.",
        "Descrição atualizada com sucesso.",
        "Description updated successfully."),
    ("flash.request.deleted",
        "Solicitud eliminada exitosamente.",
        "Solicitação excluída com sucesso.",
        "Request deleted successfully."),
    ("flash.request.quoted",
        "Solicitud {id} aceptada y cotizada.",
        "Solicitação {id} aceita e cotada.",
        "Request {id} accepted and quoted."),
    ("flash.request.rejected",
        "Solicitud {id} rechazada.",
        "Solicitação {id} rejeitada.",
        "Request {id} rejected."),
    ("flash.quote.accepted",
        "Cotización aceptada exitosamente.",
        "Cotação aceita com sucesso.",
        "Quote accepted successfully."),
    ("flash.quote.rejected",
        "Cotización rechazada exitosamente.",
        "Cotação rejeitada com sucesso.",
        "Quote rejected successfully."),
    ("flash.job.registered",
        "¡Trabajo registrado exitosamente!",
        "Trabalho registrado com sucesso!",
        "Job registered successfully!"),
    ("flash.user.approved",
        "Usuario aprobado correctamente.",
        "Usuário aprovado com sucesso.",
        "User approved successfully."),
    ("flash.user.deleted",
        "Usuario eliminado correctamente.",
        "Usuário excluído com sucesso.",
        "User deleted successfully."),
    ("flash.ticket.advanced",
        "Estado del ticket {id} cambiado a {state}.",
        "Estado do ticket {id} alterado para {state}.",
        "Ticket {id} moved to {state}."),
    ("flash.invoice.paid",
        "Pago de la factura {id} actualizado con éxito.",
        "Pagamento da fatura {id} atualizado com sucesso.",
        "Invoice {id} marked as paid."),
    ("flash.filter.applied",
        "Filtros aplicados correctamente.",
        "Filtros aplicados com sucesso.",
        "Filters applied."),
    ("flash.profile.updated",
        "Información actualizada exitosamente.",
        "Informações atualizadas com sucesso.",
        "Profile updated successfully."),
    ("flash.password.changed",
        "Contraseña cambiada exitosamente.",
        "Senha alterada com sucesso.",
        "Password changed successfully."),
    ("flash.account.deleted",
        "Cuenta eliminada exitosamente.",
        "Conta excluída com sucesso.",
        "Account deleted successfully."),
    ("flash.register.sent",
        "Solicitud registrada, espere la aceptación del administrador.",
        "Cadastro enviado, aguarde a aprovação do administrador.",
        "Registration sent, wait for the administrator's approval."),
    ("flash.password.reset",
        "Se ha actualizado la contraseña correctamente.",
        "A senha foi atualizada com sucesso.",
        "Your password has been updated."),
    ("flash.session.closed",
        "Sesión cerrada.",
        "Sessão encerrada.",
        "Signed out."),

    // --- Navegação ---
    ("nav.registrations", "Solicitudes de Registro", "Solicitações de Cadastro", "Registration Requests"),
    ("nav.work_requests", "Solicitudes de Trabajo", "Solicitações de Trabalho", "Work Requests"),
    ("nav.jobs", "Trabajos", "Trabalhos", "Jobs"),
    ("nav.register_job", "Registrar Trabajo", "Registrar Trabalho", "Register Job"),
    ("nav.payments", "Estado de Pago", "Status de Pagamento", "Payment Status"),
    ("nav.reports", "Reportes", "Relatórios", "Reports"),
    ("nav.customers", "Usuarios", "Clientes", "Customers"),
    ("nav.request_job", "Solicitar Trabajo", "Solicitar Trabalho", "Request a Job"),
    ("nav.receipts", "Comprobantes", "Comprovantes", "Receipts"),
    ("nav.profile", "Perfil", "Perfil", "Profile"),
];

// Catálogo de mensagens por idioma: lang -> (chave -> texto)
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut messages: HashMap<&'static str, HashMap<&'static str, &'static str>> = HashMap::new();
        for (key, es, pt, en) in CATALOG {
            messages.entry("es").or_default().insert(key, es);
            messages.entry("pt").or_default().insert(key, pt);
            messages.entry("en").or_default().insert(key, en);
        }
        Self { messages }
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.messages.contains_key(lang)
    }

    /// Idioma desconhecido cai no espanhol; chave desconhecida volta como está.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.messages
            .get(lang)
            .and_then(|m| m.get(key))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|m| m.get(key)))
            .map(|s| s.to_string())
            .unwrap_or_else(|| key.to_string())
    }

    pub fn format(&self, lang: &str, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.translate(lang, key);
        for (name, value) in args {
            text = text.replace(&format!("{{{}}}", name), value);
        }
        text
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}
