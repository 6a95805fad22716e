use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc;

use crate::domain::errors::DomainError;
use crate::domain::invoice::{invoice_code, render_invoice, NewInvoice};
use crate::domain::order::OrderView;
use crate::domain::ports::{InvoiceGenerator, InvoiceMailer, Store};

/// Records the invoice of an order and mails it to the customer.
pub struct InvoiceService<S> {
    store: S,
    mailer: Arc<dyn InvoiceMailer>,
}

impl<S: Store> InvoiceService<S> {
    pub fn new(store: S, mailer: Arc<dyn InvoiceMailer>) -> Self {
        Self { store, mailer }
    }
}

impl<S: Store> InvoiceGenerator for InvoiceService<S> {
    fn generate_and_send(&self, view: &OrderView) -> Result<(), DomainError> {
        let order = &view.order;
        let (invoice, recipient) = self.store.transaction(|tx| {
            let customer = tx
                .find_user(order.user_id)?
                .ok_or_else(|| DomainError::not_found("User", order.user_id))?;
            let invoice = tx.insert_invoice(&NewInvoice {
                order_id: order.id,
                invoice_code: invoice_code(order.id),
                amount: order.final_price.clone(),
                payment_method: order.payment_method,
                document: render_invoice(view, &customer),
            })?;
            Ok((invoice, customer.email))
        })?;

        let subject = format!("Your invoice {}", invoice.invoice_code);
        self.mailer
            .send_invoice(&recipient, &subject, &invoice.document)?;
        log::info!(
            "Invoice {} for order {} sent to {}",
            invoice.invoice_code,
            order.id,
            recipient
        );
        Ok(())
    }
}

/// Hands orders to a worker thread that runs the wrapped generator, so the
/// request that placed the order does not wait for the mailer.
///
/// The worker stops once every clone of the sender is dropped.
#[derive(Clone)]
pub struct QueuedInvoices {
    queue: mpsc::UnboundedSender<OrderView>,
}

impl QueuedInvoices {
    pub fn spawn(generator: Arc<dyn InvoiceGenerator>) -> std::io::Result<Self> {
        let (queue, mut pending) = mpsc::unbounded_channel::<OrderView>();
        thread::Builder::new()
            .name("invoice-worker".to_string())
            .spawn(move || {
                while let Some(view) = pending.blocking_recv() {
                    if let Err(e) = generator.generate_and_send(&view) {
                        log::error!(
                            "Failed to generate invoice for order {}: {}",
                            view.order.id,
                            e
                        );
                    }
                }
                log::debug!("Invoice worker stopped");
            })?;
        Ok(Self { queue })
    }
}

impl InvoiceGenerator for QueuedInvoices {
    fn generate_and_send(&self, view: &OrderView) -> Result<(), DomainError> {
        self.queue
            .send(view.clone())
            .map_err(|_| DomainError::Internal("invoice worker is gone".to_string()))
    }
}

/// Mailer that only writes the message to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

impl InvoiceMailer for LogMailer {
    fn send_invoice(&self, recipient: &str, subject: &str, document: &str) -> Result<(), DomainError> {
        log::info!(
            "Mail to {} '{}' ({} bytes)",
            recipient,
            subject,
            document.len()
        );
        log::debug!("{}", document);
        Ok(())
    }
}
